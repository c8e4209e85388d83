//! Command-line interface for brew-linker.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Match every brewery and beer of an old catalog against a new one
//! - **compare**: Show how two names score against each other
//! - **normalize**: Print the normalized form of names
//! - **catalog**: Summarize a catalog or export it as JSON
//!
//! ## Usage
//!
//! ```text
//! # Match the old dump against the new one
//! brew-linker resolve old_beers.csv new_beers.csv
//!
//! # Only Great Lakes, withdrawing perfectly matched beers, remembering them
//! brew-linker resolve old_beers.csv new_beers.csv --filter 'great lakes' \
//!     --consume perfect --mapping perfect_matches.csv
//!
//! # JSON output for scripting
//! brew-linker resolve old_beers.csv new_beers.csv --format json
//!
//! # Why did these two not match?
//! brew-linker compare "Bell's Brewery, Inc." "Bells Brewing" --kind brewery
//! ```

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::catalog::store::Catalog;
use crate::parsing::dump::parse_dump_file;

pub mod catalog;
pub mod compare;
pub mod normalize;
pub mod resolve;

#[derive(Parser)]
#[command(name = "brew-linker")]
#[command(version)]
#[command(about = "Link breweries and beers between two catalogs")]
#[command(
    long_about = "brew-linker matches the breweries and beers of an old catalog to their counterparts in a new one.\n\nNames are normalized, then scored by the words and word pairs they share, weighted by how rare those are in each catalog. Breweries are matched first; each beer is only compared with the beers of the matched brewery."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match an old catalog against a new one
    Resolve(resolve::ResolveArgs),

    /// Score two names against each other
    Compare(compare::CompareArgs),

    /// Print normalized names
    Normalize(normalize::NormalizeArgs),

    /// Summarize or export a catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a catalog: `.json` files are catalog documents, anything else a CSV dump
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let catalog = match ext.as_deref() {
        Some("json") => Catalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        _ => parse_dump_file(path)
            .with_context(|| format!("Failed to parse dump {}", path.display()))?,
    };
    Ok(catalog)
}
