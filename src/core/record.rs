use serde::{Deserialize, Serialize};

use crate::core::normalize::{normalize, normalize_brewery, strip_common_prefix};
use crate::core::types::RecordId;

/// A beer as listed in one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerRecord {
    /// Catalog-local identifier
    pub id: RecordId,

    /// Name as it appears in the source catalog
    #[serde(rename = "name")]
    pub raw_name: String,

    // === Derived, recomputed by `BreweryRecord::rebuild_names` ===
    /// Normalized name with the brewery-name prefix stripped
    #[serde(skip)]
    pub name: String,

    /// Normalized name of the owning brewery
    #[serde(skip)]
    pub brewery_name: String,
}

impl BeerRecord {
    pub fn new(id: impl Into<String>, raw_name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            raw_name: raw_name.into(),
            name: String::new(),
            brewery_name: String::new(),
        }
    }

    fn rebuild_name(&mut self, brewery_name: &str) {
        self.name = strip_common_prefix(&normalize(&self.raw_name), brewery_name);
        self.brewery_name = brewery_name.to_string();
    }
}

/// A brewery and the beers it owns in one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreweryRecord {
    /// Catalog-local identifier
    pub id: RecordId,

    /// Name as it appears in the source catalog
    #[serde(rename = "name")]
    pub raw_name: String,

    /// Normalized name
    #[serde(skip)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beers: Vec<BeerRecord>,
}

impl BreweryRecord {
    pub fn new(id: impl Into<String>, raw_name: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        Self {
            id: RecordId::new(id),
            name: normalize_brewery(&raw_name),
            raw_name,
            beers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_beer(mut self, id: impl Into<String>, raw_name: impl Into<String>) -> Self {
        self.add_beer(BeerRecord::new(id, raw_name));
        self
    }

    /// Add a beer, deriving its normalized name from this brewery's
    pub fn add_beer(&mut self, mut beer: BeerRecord) {
        beer.rebuild_name(&self.name);
        self.beers.push(beer);
    }

    /// Check whether a beer with this id is already listed
    pub fn has_beer(&self, id: &RecordId) -> bool {
        self.beers.iter().any(|b| &b.id == id)
    }

    /// Recompute all derived names (after deserialization)
    pub fn rebuild_names(&mut self) {
        self.name = normalize_brewery(&self.raw_name);
        for beer in &mut self.beers {
            beer.rebuild_name(&self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brewery_normalizes_on_construction() {
        let brewery = BreweryRecord::new("7", "Great Lakes Brewing Co");
        assert_eq!(brewery.raw_name, "Great Lakes Brewing Co");
        assert_eq!(brewery.name, "great lakes");
    }

    #[test]
    fn test_beer_name_strips_brewery_prefix() {
        let brewery =
            BreweryRecord::new("7", "Great Lakes Brewing").with_beer("70", "Great Lakes Big Black Smoke");
        let beer = &brewery.beers[0];
        assert_eq!(beer.raw_name, "Great Lakes Big Black Smoke");
        assert_eq!(beer.name, "big black smoke");
        assert_eq!(beer.brewery_name, "great lakes");
    }

    #[test]
    fn test_rebuild_names_after_deserialize() {
        let json = r#"{"id":"1","name":"Bell's Brewery, Inc.","beers":[{"id":"10","name":"Bell's Two Hearted Ale"}]}"#;
        let mut brewery: BreweryRecord = serde_json::from_str(json).unwrap();
        assert!(brewery.name.is_empty());

        brewery.rebuild_names();
        assert_eq!(brewery.name, "bells");
        assert_eq!(brewery.beers[0].name, "two hearted ale");
        assert!(brewery.has_beer(&RecordId::new("10")));
    }
}
