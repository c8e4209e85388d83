//! Parsers for catalog dump files.
//!
//! A dump is a CSV file with one row per beer/brewery pair:
//!
//! | Column       | Description                          | Required |
//! |--------------|--------------------------------------|----------|
//! | `id`         | Beer id, empty for a brewery-only row | No      |
//! | `name`       | Beer name                             | No      |
//! | `brewery_id` | Brewery id                            | Yes     |
//! | `brewery`    | Brewery name                          | Yes     |
//!
//! ## Example
//!
//! ```rust,no_run
//! use brew_linker::parsing::dump::{parse_dump_file, parse_dump_text};
//! use std::path::Path;
//!
//! let catalog = parse_dump_file(Path::new("old_beers.csv")).unwrap();
//!
//! let catalog = parse_dump_text("10,Dortmunder Gold,1,Great Lakes Brewing Co\n").unwrap();
//! assert_eq!(catalog.breweries[0].name, "great lakes");
//! ```

pub mod dump;
