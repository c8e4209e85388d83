//! # brew-linker
//!
//! A library for linking the breweries and beers of an old catalog to their
//! counterparts in a new one.
//!
//! The same beer is rarely spelled the same way twice: `Bell's Brewery, Inc.`
//! becomes `Bells Brewing`, and `Great Lakes Big Black Smoke` is listed as
//! `Big Black Smoke` under `Great Lakes Brewing Co`. `brew-linker` normalizes
//! both sides and scores candidate pairs by the words and word pairs they
//! share, weighted by how rare those are in each catalog.
//!
//! ## Features
//!
//! - **Name normalization**: Folds accents, drops legal suffixes and brewery
//!   boilerplate, strips the brewery name from the front of beer names
//! - **Rarity-weighted scoring**: A word found once on each side settles a match
//! - **Hierarchical matching**: Beers are only compared within the matched brewery
//! - **Consumption policies**: Optionally withdraw matched beers from later pools
//! - **Resolution cache**: Perfect matches are remembered across runs
//!
//! ## Example
//!
//! ```rust,no_run
//! use brew_linker::{MatchingConfig, Reconciler};
//! use brew_linker::matching::cache::MemoryCache;
//! use brew_linker::matching::reconcile::ReconcileOptions;
//! use brew_linker::parsing::dump::parse_dump_text;
//!
//! let old = parse_dump_text("10,Dortmunder Gold,1,Great Lakes Brewing\n").unwrap();
//! let new = parse_dump_text("a1,Dortmunder Gold,a,Great Lakes Brewing Co\n").unwrap();
//!
//! let reconciler = Reconciler::new(&old, &new, MatchingConfig::default(), ReconcileOptions::default());
//! let report = reconciler.run(&mut MemoryCache::new());
//!
//! assert_eq!(report.summary.perfect_matches, 1);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Catalog storage, indexing and word frequencies
//! - [`core`]: Records, identifiers and name normalization
//! - [`matching`]: Scoring, matching engine and reconciliation
//! - [`parsing`]: Parser for CSV catalog dumps
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::catalog::store::Catalog;
pub use crate::core::normalize::{normalize, normalize_brewery, strip_common_prefix};
pub use crate::core::record::{BeerRecord, BreweryRecord};
pub use crate::core::types::*;
pub use crate::matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine};
pub use crate::matching::reconcile::Reconciler;
