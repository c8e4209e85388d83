use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::record::{BeerRecord, BreweryRecord};
use crate::core::types::RecordId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub breweries: Vec<BreweryRecord>,
}

/// One side of a reconciliation: breweries in source order, each owning its beers
#[derive(Debug, Default)]
pub struct Catalog {
    /// All breweries, in the order they were added
    pub breweries: Vec<BreweryRecord>,

    /// Index: brewery ID -> index in breweries vec
    id_to_index: HashMap<RecordId, usize>,

    /// Index: beer ID -> (brewery index, beer index) of its first listing
    beer_to_position: HashMap<RecordId, (usize, usize)>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from breweries whose names are already derived
    pub fn from_breweries(breweries: impl IntoIterator<Item = BreweryRecord>) -> Self {
        let mut catalog = Self::new();
        for brewery in breweries {
            catalog.add_brewery(brewery);
        }
        catalog
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Catalog version mismatch"
            );
        }

        let mut catalog = Self::new();
        for mut brewery in data.breweries {
            brewery.rebuild_names();
            catalog.add_brewery(brewery);
        }

        Ok(catalog)
    }

    /// Add a brewery to the catalog
    pub fn add_brewery(&mut self, brewery: BreweryRecord) {
        let index = self.breweries.len();

        self.id_to_index.entry(brewery.id.clone()).or_insert(index);
        for (beer_index, beer) in brewery.beers.iter().enumerate() {
            self.beer_to_position
                .entry(beer.id.clone())
                .or_insert((index, beer_index));
        }

        self.breweries.push(brewery);
    }

    /// Get a brewery by ID
    pub fn get(&self, id: &RecordId) -> Option<&BreweryRecord> {
        self.id_to_index.get(id).map(|&idx| &self.breweries[idx])
    }

    /// Find a beer by ID, together with the brewery it is first listed under
    pub fn find_beer(&self, id: &RecordId) -> Option<(&BreweryRecord, &BeerRecord)> {
        self.beer_to_position.get(id).map(|&(brewery_idx, beer_idx)| {
            let brewery = &self.breweries[brewery_idx];
            (brewery, &brewery.beers[beer_idx])
        })
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            breweries: self.breweries.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Normalized names of every brewery, in catalog order (duplicates included)
    pub fn brewery_names(&self) -> impl Iterator<Item = &str> {
        self.breweries.iter().map(|b| b.name.as_str())
    }

    /// Normalized names of every beer listing, in catalog order
    pub fn beer_names(&self) -> impl Iterator<Item = &str> {
        self.breweries
            .iter()
            .flat_map(|b| b.beers.iter().map(|beer| beer.name.as_str()))
    }

    /// Number of breweries in catalog
    pub fn len(&self) -> usize {
        self.breweries.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.breweries.is_empty()
    }

    /// Number of beer listings across all breweries
    pub fn beer_count(&self) -> usize {
        self.breweries.iter().map(|b| b.beers.len()).sum()
    }
}
