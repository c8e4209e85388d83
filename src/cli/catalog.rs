use std::path::PathBuf;

use clap::Args;

use crate::catalog::index::BreweryIndex;
use crate::catalog::store::Catalog;
use crate::cli::{load_catalog, OutputFormat};

#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog to load (CSV dump, or .json catalog)
    #[arg(required = true)]
    pub path: PathBuf,

    /// Only list breweries that share their normalized name with another brewery
    #[arg(long)]
    pub duplicates: bool,
}

pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.path)?;

    if verbose {
        eprintln!(
            "Loaded {}: {} breweries, {} beers",
            args.path.display(),
            catalog.len(),
            catalog.beer_count()
        );
    }

    match format {
        OutputFormat::Text => print_text_catalog(&args, &catalog),
        OutputFormat::Json => println!("{}", catalog.to_json()?),
        OutputFormat::Tsv => print_tsv_catalog(&args, &catalog),
    }

    Ok(())
}

/// Catalog positions to list, in catalog order
fn listed_positions(args: &CatalogArgs, catalog: &Catalog) -> Vec<usize> {
    if !args.duplicates {
        return (0..catalog.len()).collect();
    }

    let index = BreweryIndex::build(catalog);
    let mut positions: Vec<usize> = index
        .names()
        .iter()
        .map(|name| index.positions(name))
        .filter(|positions| positions.len() > 1)
        .flat_map(|positions| positions.iter().copied())
        .collect();
    positions.sort_unstable();
    positions
}

fn print_text_catalog(args: &CatalogArgs, catalog: &Catalog) {
    println!("Catalog: {}", args.path.display());
    println!(
        "{} breweries, {} beers",
        catalog.len(),
        catalog.beer_count()
    );
    println!();

    println!("{:<12} {:<40} {:<30} {:>6}", "ID", "Brewery", "Normalized", "Beers");
    println!("{}", "-".repeat(91));

    for idx in listed_positions(args, catalog) {
        let brewery = &catalog.breweries[idx];
        println!(
            "{:<12} {:<40} {:<30} {:>6}",
            brewery.id.as_str(),
            brewery.raw_name,
            brewery.name,
            brewery.beers.len()
        );
    }
}

fn print_tsv_catalog(args: &CatalogArgs, catalog: &Catalog) {
    println!("id\tname\tnormalized\tbeers");
    for idx in listed_positions(args, catalog) {
        let brewery = &catalog.breweries[idx];
        println!(
            "{}\t{}\t{}\t{}",
            brewery.id,
            brewery.raw_name,
            brewery.name,
            brewery.beers.len()
        );
    }
}
