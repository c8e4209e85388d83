use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::catalog::frequency::FrequencyModel;
use crate::catalog::index::BreweryIndex;
use crate::catalog::store::Catalog;
use crate::core::record::{BeerRecord, BreweryRecord};
use crate::core::types::{serialize_score, MatchType, NameKind, RecordId};
use crate::matching::scoring::{ScoringWeights, SimilarityScorer};

/// Default minimum score threshold for matches
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// A match must score strictly above this value
    pub min_score: f64,
    /// Custom scoring weights
    pub scoring_weights: ScoringWeights,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            scoring_weights: ScoringWeights::default(),
        }
    }
}

impl MatchingConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Found by scoring candidates
    Scored,
    /// Replayed from a resolution cache
    Cache,
}

/// What a result reports about a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRef {
    pub id: RecordId,
    /// Name as listed in the catalog
    pub name: String,
    /// Name used for scoring
    pub normalized: String,
}

impl RecordRef {
    pub fn from_brewery(brewery: &BreweryRecord) -> Self {
        Self {
            id: brewery.id.clone(),
            name: brewery.raw_name.clone(),
            normalized: brewery.name.clone(),
        }
    }

    pub fn from_beer(beer: &BeerRecord) -> Self {
        Self {
            id: beer.id.clone(),
            name: beer.raw_name.clone(),
            normalized: beer.name.clone(),
        }
    }
}

/// Result of matching one old record against the new catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        record: RecordRef,
        #[serde(serialize_with = "serialize_score")]
        score: f64,
        source: MatchSource,
    },
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Matched { score, .. } => Some(*score),
            Self::NoMatch => None,
        }
    }

    pub fn record(&self) -> Option<&RecordRef> {
        match self {
            Self::Matched { record, .. } => Some(record),
            Self::NoMatch => None,
        }
    }

    /// Matched with a score of +inf
    pub fn is_perfect(&self) -> bool {
        self.score() == Some(f64::INFINITY)
    }

    pub fn match_type(&self) -> MatchType {
        match self {
            Self::Matched { score, .. } if *score == f64::INFINITY => MatchType::Exact,
            Self::Matched { .. } => MatchType::Fuzzy,
            Self::NoMatch => MatchType::NoMatch,
        }
    }
}

/// Match result for one old beer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerResolution {
    pub old_beer: RecordRef,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    /// New brewery listing the matched beer. It can differ from the brewery
    /// outcome when several new breweries share a normalized name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_brewery: Option<RecordRef>,
}

/// Match result for one old brewery, followed by the results for its beers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreweryResolution {
    pub old_brewery: RecordRef,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    pub beers: Vec<BeerResolution>,
}

/// First candidate with the highest score. Stops early on +inf.
fn best_by<T>(candidates: impl IntoIterator<Item = T>, mut score: impl FnMut(&T) -> f64) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for candidate in candidates {
        let candidate_score = score(&candidate);
        let improves = best.as_ref().map_or(true, |(_, s)| candidate_score > *s);
        if improves {
            best = Some((candidate, candidate_score));
            if candidate_score == f64::INFINITY {
                break;
            }
        }
    }
    best
}

/// Hierarchical matcher against a fixed new catalog.
///
/// Breweries are matched first; a beer is only ever compared with the beers
/// of the new brewery its old brewery matched.
pub struct MatchingEngine<'a> {
    catalog: &'a Catalog,
    index: BreweryIndex,
    scorer: SimilarityScorer<'a>,
    /// Configuration including scoring weights and thresholds
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(catalog: &'a Catalog, model: &'a FrequencyModel) -> Self {
        Self::with_config(catalog, model, MatchingConfig::default())
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(catalog: &'a Catalog, model: &'a FrequencyModel, config: MatchingConfig) -> Self {
        Self {
            catalog,
            index: BreweryIndex::build(catalog),
            scorer: SimilarityScorer::with_weights(model, config.scoring_weights),
            config,
        }
    }

    /// Find the new brewery whose normalized name best matches `old`
    pub fn match_brewery(&self, old: &BreweryRecord) -> MatchOutcome {
        let best = best_by(self.index.names(), |name| {
            self.scorer.similarity(&old.name, name, NameKind::Brewery)
        });

        match best {
            Some((name, score)) if score > self.config.min_score => {
                let Some(&position) = self.index.positions(name).first() else {
                    return MatchOutcome::NoMatch;
                };
                let matched = &self.catalog.breweries[position];
                debug!(old = %old.raw_name, new = %matched.raw_name, score, "Brewery matched");
                MatchOutcome::Matched {
                    record: RecordRef::from_brewery(matched),
                    score,
                    source: MatchSource::Scored,
                }
            }
            _ => {
                debug!(old = %old.raw_name, "No brewery match");
                MatchOutcome::NoMatch
            }
        }
    }

    /// Match a beer among the beers of the brewery its old brewery matched
    pub fn match_beer(&self, old_beer: &BeerRecord, brewery: &MatchOutcome) -> MatchOutcome {
        self.match_beer_with(old_beer, brewery, &|_| true)
    }

    /// Like [`Self::match_beer`], considering only new beers for which
    /// `available` returns true
    pub fn match_beer_with(
        &self,
        old_beer: &BeerRecord,
        brewery: &MatchOutcome,
        available: &dyn Fn(&RecordId) -> bool,
    ) -> MatchOutcome {
        let Some(matched_brewery) = brewery.record() else {
            return MatchOutcome::NoMatch;
        };

        let candidates = self
            .index
            .beers_of(self.catalog, &matched_brewery.normalized)
            .filter(|beer| available(&beer.id));
        let best = best_by(candidates, |beer| {
            self.scorer.similarity(&old_beer.name, &beer.name, NameKind::Beer)
        });

        match best {
            Some((beer, score)) if score > self.config.min_score => MatchOutcome::Matched {
                record: RecordRef::from_beer(beer),
                score,
                source: MatchSource::Scored,
            },
            _ => MatchOutcome::NoMatch,
        }
    }

    /// New brewery, among those sharing the matched brewery's normalized
    /// name, that lists the beer `beer`. None when the brewery did not match.
    pub fn owning_brewery(&self, brewery: &MatchOutcome, beer: &RecordId) -> Option<&'a BreweryRecord> {
        let matched_brewery = brewery.record()?;
        self.index
            .owner_of(self.catalog, &matched_brewery.normalized, beer)
    }

    /// Pair a beer outcome with the new brewery that owns the matched beer
    pub fn beer_resolution(
        &self,
        old_beer: &BeerRecord,
        brewery: &MatchOutcome,
        outcome: MatchOutcome,
    ) -> BeerResolution {
        let new_brewery = outcome
            .record()
            .and_then(|beer| self.owning_brewery(brewery, &beer.id))
            .map(RecordRef::from_brewery);
        BeerResolution {
            old_beer: RecordRef::from_beer(old_beer),
            outcome,
            new_brewery,
        }
    }

    /// Match an old brewery and one of its beers
    pub fn match_pair(&self, old_brewery: &BreweryRecord, old_beer: &BeerRecord) -> (MatchOutcome, MatchOutcome) {
        let brewery = self.match_brewery(old_brewery);
        let beer = self.match_beer(old_beer, &brewery);
        (brewery, beer)
    }

    /// Match an old brewery and all of its beers
    pub fn resolve(&self, old_brewery: &BreweryRecord) -> BreweryResolution {
        let outcome = self.match_brewery(old_brewery);
        let beers = old_brewery
            .beers
            .iter()
            .map(|beer| self.beer_resolution(beer, &outcome, self.match_beer(beer, &outcome)))
            .collect();

        BreweryResolution {
            old_brewery: RecordRef::from_brewery(old_brewery),
            outcome,
            beers,
        }
    }
}
