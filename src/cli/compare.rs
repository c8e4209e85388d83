use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;

use crate::catalog::frequency::FrequencyModel;
use crate::cli::{load_catalog, OutputFormat};
use crate::core::normalize::{normalize_as, word_set};
use crate::core::types::{format_score, MatchType, NameKind, Side};
use crate::matching::engine::DEFAULT_MIN_SCORE;
use crate::matching::scoring::{ScoreReason, SimilarityScore, SimilarityScorer};

#[derive(Args)]
pub struct CompareArgs {
    /// Name from the old catalog
    #[arg(required = true)]
    pub name_a: String,

    /// Name from the new catalog
    #[arg(required = true)]
    pub name_b: String,

    /// Whether the names are brewery or beer names
    #[arg(long, value_enum, default_value = "beer")]
    pub kind: NameKind,

    /// Old catalog to count word frequencies from
    #[arg(long, requires = "new")]
    pub old: Option<PathBuf>,

    /// New catalog to count word frequencies from
    #[arg(long, requires = "old")]
    pub new: Option<PathBuf>,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let model = match (&args.old, &args.new) {
        (Some(old_path), Some(new_path)) => {
            let old = load_catalog(old_path)?;
            let new = load_catalog(new_path)?;
            if verbose {
                eprintln!(
                    "Counting frequencies over {} old and {} new {} names",
                    match args.kind {
                        NameKind::Brewery => old.len(),
                        NameKind::Beer => old.beer_count(),
                    },
                    match args.kind {
                        NameKind::Brewery => new.len(),
                        NameKind::Beer => new.beer_count(),
                    },
                    args.kind
                );
            }
            FrequencyModel::build(&old, &new)
        }
        _ => FrequencyModel::default(),
    };

    let normalized_a = normalize_as(&args.name_a, args.kind);
    let normalized_b = normalize_as(&args.name_b, args.kind);

    let scorer = SimilarityScorer::new(&model);
    let score = scorer.score_detail(&normalized_a, &normalized_b, args.kind);

    let comparison = Comparison {
        args: &args,
        model: &model,
        normalized_a: &normalized_a,
        normalized_b: &normalized_b,
        score: &score,
    };

    match format {
        OutputFormat::Text => print_text_comparison(&comparison),
        OutputFormat::Json => print_json_comparison(&comparison)?,
        OutputFormat::Tsv => print_tsv_comparison(&comparison),
    }

    Ok(())
}

struct Comparison<'a> {
    args: &'a CompareArgs,
    model: &'a FrequencyModel,
    normalized_a: &'a str,
    normalized_b: &'a str,
    score: &'a SimilarityScore,
}

impl Comparison<'_> {
    fn match_type(&self) -> MatchType {
        MatchType::from_score(self.score.total, DEFAULT_MIN_SCORE)
    }

    /// Every scored word of either name with its (old, new) counts
    fn word_counts(&self) -> Vec<(&str, usize, usize)> {
        let words: BTreeSet<&str> = word_set(self.normalized_a)
            .union(&word_set(self.normalized_b))
            .copied()
            .collect();
        let old = self.model.corpus(Side::Old, self.args.kind);
        let new = self.model.corpus(Side::New, self.args.kind);

        words
            .into_iter()
            .map(|w| (w, old.words.get(w), new.words.get(w)))
            .collect()
    }
}

fn describe_reason(reason: &ScoreReason) -> String {
    match reason {
        ScoreReason::Blank => "blank name".to_string(),
        ScoreReason::IdenticalNames => "identical names".to_string(),
        ScoreReason::UniqueSharedWord(word) => format!("shared unique word '{word}'"),
        ScoreReason::UniqueSharedBigram(bigram) => format!("shared unique phrase '{bigram}'"),
        ScoreReason::Accumulated => "word and bigram scores".to_string(),
    }
}

fn print_text_comparison(comparison: &Comparison<'_>) {
    let args = comparison.args;
    let score = comparison.score;

    println!("Comparison Results ({} names)", args.kind);
    println!("{}", "=".repeat(60));

    println!("\nA: {}", args.name_a);
    println!("  Normalized: {}", comparison.normalized_a);
    println!("\nB: {}", args.name_b);
    println!("  Normalized: {}", comparison.normalized_b);

    let counts = comparison.word_counts();
    if !counts.is_empty() {
        println!("\nWord Frequencies (old / new):");
        for (word, old, new) in counts {
            println!("  {word}: {old} / {new}");
        }
    }

    println!("\nScores:");
    println!("  Word score: {}", format_score(score.word_score));
    println!("  Bigram score: {}", format_score(score.ngram_score));
    println!("  Total: {}", format_score(score.total));
    println!("  Reason: {}", describe_reason(&score.reason));
    println!("  Match type: {:?}", comparison.match_type());
}

fn print_json_comparison(comparison: &Comparison<'_>) -> anyhow::Result<()> {
    let args = comparison.args;
    let words: Vec<_> = comparison
        .word_counts()
        .into_iter()
        .map(|(word, old, new)| serde_json::json!({ "word": word, "old": old, "new": new }))
        .collect();

    let output = serde_json::json!({
        "kind": args.kind,
        "a": {
            "name": args.name_a,
            "normalized": comparison.normalized_a,
        },
        "b": {
            "name": args.name_b,
            "normalized": comparison.normalized_b,
        },
        "words": words,
        "score": comparison.score,
        "match_type": comparison.match_type(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_comparison(comparison: &Comparison<'_>) {
    let score = comparison.score;
    println!("normalized_a\tnormalized_b\tword_score\tngram_score\ttotal\treason");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        comparison.normalized_a,
        comparison.normalized_b,
        format_score(score.word_score),
        format_score(score.ngram_score),
        format_score(score.total),
        describe_reason(&score.reason),
    );
}
