use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_catalog, OutputFormat};
use crate::core::types::format_score;
use crate::matching::cache::{MappingFile, MemoryCache};
use crate::matching::engine::{
    BreweryResolution, MatchOutcome, MatchSource, MatchingConfig, RecordRef,
};
use crate::matching::reconcile::{ConsumePolicy, ReconcileOptions, ReconcileReport, Reconciler};
use crate::utils::validation::compile_filter;

#[derive(Args)]
pub struct ResolveArgs {
    /// Old catalog (CSV dump, or .json catalog)
    #[arg(required = true)]
    pub old: PathBuf,

    /// New catalog (CSV dump, or .json catalog)
    #[arg(required = true)]
    pub new: PathBuf,

    /// Only process old breweries or beers whose normalized name matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Minimum score for a match (overrides the config file)
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<f64>,

    /// Withdraw matched new beers from later candidate pools
    #[arg(long, value_enum, default_value = "none")]
    pub consume: ConsumePolicy,

    /// CSV of old_id,new_id perfect matches: replayed before scoring, updated after
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// JSON matching configuration (min_score, scoring_weights)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => MatchingConfig::load_from_file(path)?,
        None => MatchingConfig::default(),
    };
    if let Some(min_score) = args.min_score {
        config.min_score = min_score;
    }

    let filter = args.filter.as_deref().map(compile_filter).transpose()?;
    let options = ReconcileOptions {
        filter,
        consume: args.consume,
    };

    let old = load_catalog(&args.old)?;
    let new = load_catalog(&args.new)?;

    if verbose {
        eprintln!(
            "Loaded old catalog: {} breweries, {} beers",
            old.len(),
            old.beer_count()
        );
        eprintln!(
            "Loaded new catalog: {} breweries, {} beers",
            new.len(),
            new.beer_count()
        );
    }

    if new.is_empty() {
        eprintln!("Warning: New catalog is empty, nothing will match.");
    }

    let reconciler = Reconciler::new(&old, &new, config, options);

    let report = if let Some(path) = &args.mapping {
        let mut mapping = MappingFile::open(path)?;
        let before = mapping.len();
        let report = reconciler.run(&mut mapping);
        mapping.save()?;
        if verbose {
            eprintln!(
                "Mapping file {}: {} entries ({} new)",
                path.display(),
                mapping.len(),
                mapping.len() - before
            );
        }
        report
    } else {
        reconciler.run(&mut MemoryCache::new())
    };

    match format {
        OutputFormat::Text => print_text_results(&report),
        OutputFormat::Json => print_json_results(&report)?,
        OutputFormat::Tsv => print_tsv_results(&report),
    }

    Ok(())
}

fn score_label(outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Matched {
            score,
            source: MatchSource::Cache,
            ..
        } => format!("[ {} cached ]", format_score(*score)),
        MatchOutcome::Matched { score, .. } => format!("[ {} ]", format_score(*score)),
        MatchOutcome::NoMatch => "[ no match ]".to_string(),
    }
}

fn print_brewery_text(brewery: &BreweryResolution) {
    let old_brewery = &brewery.old_brewery.name;

    match brewery.outcome.record() {
        Some(new_brewery) => println!(
            "{} {} -> {}",
            score_label(&brewery.outcome),
            old_brewery,
            new_brewery.name
        ),
        None => println!("{} {}", score_label(&brewery.outcome), old_brewery),
    }

    for beer in &brewery.beers {
        let new_brewery = beer.new_brewery.as_ref().map(|r| r.name.as_str());
        match (beer.outcome.record(), new_brewery) {
            (Some(new_beer), Some(new_brewery)) => println!(
                "  {} {} [{}] -> {} [{}]",
                score_label(&beer.outcome),
                beer.old_beer.name,
                old_brewery,
                new_beer.name,
                new_brewery
            ),
            (Some(new_beer), None) => println!(
                "  {} {} [{}] -> {}",
                score_label(&beer.outcome),
                beer.old_beer.name,
                old_brewery,
                new_beer.name
            ),
            (None, _) => println!(
                "  {} {} [{}]",
                score_label(&beer.outcome),
                beer.old_beer.name,
                old_brewery
            ),
        }
    }
}

fn print_text_results(report: &ReconcileReport) {
    for brewery in &report.breweries {
        print_brewery_text(brewery);
    }

    let summary = &report.summary;
    println!();
    println!(
        "Breweries: {} processed, {} matched, {} skipped",
        summary.old_breweries, summary.brewery_matches, summary.skipped_breweries
    );
    println!(
        "Beers: {} processed, {} matched ({} perfect, {} from cache)",
        summary.old_beers, summary.beer_matches, summary.perfect_matches, summary.cache_hits
    );
}

fn print_json_results(report: &ReconcileReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_tsv_results(report: &ReconcileReport) {
    println!(
        "old_brewery_id\told_brewery\tnew_brewery_id\tnew_brewery\tbrewery_score\told_beer_id\told_beer\tnew_beer_id\tnew_beer\tbeer_score\tsource"
    );

    for brewery in &report.breweries {
        let columns_for = |new_brewery: Option<&RecordRef>| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                brewery.old_brewery.id,
                brewery.old_brewery.name,
                new_brewery.map(|r| r.id.as_str()).unwrap_or(""),
                new_brewery.map(|r| r.name.as_str()).unwrap_or(""),
                brewery.outcome.score().map(format_score).unwrap_or_default(),
            )
        };

        if brewery.beers.is_empty() {
            println!("{}\t\t\t\t\t\t", columns_for(brewery.outcome.record()));
            continue;
        }

        for beer in &brewery.beers {
            let brewery_cols =
                columns_for(beer.new_brewery.as_ref().or_else(|| brewery.outcome.record()));
            let (new_id, new_name, score, source) = match &beer.outcome {
                MatchOutcome::Matched {
                    record,
                    score,
                    source,
                } => (
                    record.id.as_str(),
                    record.name.as_str(),
                    format_score(*score),
                    match source {
                        MatchSource::Scored => "scored",
                        MatchSource::Cache => "cache",
                    },
                ),
                MatchOutcome::NoMatch => ("", "", String::new(), ""),
            };
            println!(
                "{brewery_cols}\t{}\t{}\t{new_id}\t{new_name}\t{score}\t{source}",
                beer.old_beer.id, beer.old_beer.name
            );
        }
    }
}
