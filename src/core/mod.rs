//! Core data types and name normalization.
//!
//! - [`BreweryRecord`], [`BeerRecord`]: catalog records keeping both the raw
//!   name and its normalized form
//! - [`RecordId`], [`Side`], [`NameKind`], [`MatchType`]: identifiers and
//!   classification types
//! - [`normalize`]: the name canonicalization pipeline used by every
//!   downstream stage
//!
//! ## Normalization
//!
//! | Raw name                          | Normalized           |
//! |-----------------------------------|----------------------|
//! | `Great Lakes Brewing Co`          | `great lakes`        |
//! | `Bell's Brewery, Inc.`            | `bells`              |
//! | `Brouwerij Het Anker N.V.`        | `brouwerij het anker`|
//! | `Great Lakes Big Black Smoke`[^1] | `big black smoke`    |
//!
//! [^1]: a beer listed under `Great Lakes Brewing`
//!
//! [`BreweryRecord`]: record::BreweryRecord
//! [`BeerRecord`]: record::BeerRecord
//! [`RecordId`]: types::RecordId
//! [`Side`]: types::Side
//! [`NameKind`]: types::NameKind
//! [`MatchType`]: types::MatchType

pub mod normalize;
pub mod record;
pub mod types;
