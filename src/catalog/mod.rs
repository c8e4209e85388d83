//! Catalog storage, indexing and corpus statistics.
//!
//! A [`Catalog`] is one side of a reconciliation: breweries in source order,
//! each owning its beers. Catalogs are normally read from the CSV dumps (see
//! [`crate::parsing::dump`]), but can also be exported to and loaded from a
//! versioned JSON document.
//!
//! ## Example
//!
//! ```rust,no_run
//! use brew_linker::Catalog;
//! use brew_linker::catalog::frequency::FrequencyModel;
//! use std::path::Path;
//!
//! let old = Catalog::load_from_file(Path::new("old_catalog.json")).unwrap();
//! let new = Catalog::load_from_file(Path::new("new_catalog.json")).unwrap();
//!
//! // Word and bigram frequencies for both sides, built once per run
//! let model = FrequencyModel::build(&old, &new);
//!
//! // Export to JSON
//! let json = new.to_json().unwrap();
//! ```
//!
//! [`Catalog`]: store::Catalog

pub mod frequency;
pub mod index;
pub mod store;
