//! Name scoring, hierarchical matching and batch reconciliation.
//!
//! - [`SimilarityScorer`]: frequency-weighted similarity of two normalized names
//! - [`MatchingEngine`]: brewery-then-beer matching against the new catalog
//! - [`Reconciler`]: runs the engine over a whole old catalog, with filtering,
//!   consumption and a resolution cache layered on top
//!
//! ## Scoring
//!
//! Two names score `+inf` when they are identical, or when they share a word
//! (or adjacent word pair) that occurs in exactly one name on each side.
//! Otherwise the score adds:
//!
//! - **Word score**: shared words earn `1 / frequency`, one-sided words cost
//!   `2 / frequency`, both normalized by the number of distinct words
//! - **Bigram score**: each shared adjacent word pair earns `5 / frequency`
//!
//! where `frequency` is the mean of the token's old-side and new-side counts.
//!
//! ## Matching
//!
//! An old brewery is matched to the best-scoring distinct new brewery name.
//! Its beers are then only compared with the beers listed under that name.
//! Either tier reports no match unless its best score is strictly above
//! `min_score`; ties go to the first candidate in catalog order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use brew_linker::{Catalog, MatchingConfig, Reconciler};
//! use brew_linker::matching::cache::MemoryCache;
//! use brew_linker::matching::reconcile::ReconcileOptions;
//! use brew_linker::parsing::dump::parse_dump_file;
//! use std::path::Path;
//!
//! let old = parse_dump_file(Path::new("old_beers.csv")).unwrap();
//! let new = parse_dump_file(Path::new("new_beers.csv")).unwrap();
//!
//! let reconciler = Reconciler::new(&old, &new, MatchingConfig::default(), ReconcileOptions::default());
//! let report = reconciler.run(&mut MemoryCache::new());
//!
//! for brewery in &report.breweries {
//!     for beer in &brewery.beers {
//!         println!("{}: {:?}", beer.old_beer.name, beer.outcome.match_type());
//!     }
//! }
//! ```
//!
//! [`SimilarityScorer`]: scoring::SimilarityScorer
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`Reconciler`]: reconcile::Reconciler

pub mod cache;
pub mod engine;
pub mod reconcile;
pub mod scoring;
