//! Batch reconciliation of a whole old catalog against a new one.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::catalog::frequency::FrequencyModel;
use crate::catalog::store::Catalog;
use crate::core::record::{BeerRecord, BreweryRecord};
use crate::core::types::RecordId;
use crate::matching::cache::ResolutionCache;
use crate::matching::engine::{
    BreweryResolution, MatchOutcome, MatchSource, MatchingConfig, MatchingEngine, RecordRef,
};

/// Which matched new beers are withdrawn from later candidate pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ConsumePolicy {
    /// Never withdraw; several old beers may map to one new beer
    #[default]
    None,
    /// Withdraw beers matched with +inf at both tiers
    Perfect,
    /// Withdraw every matched beer
    All,
}

impl ConsumePolicy {
    fn consumes(self, brewery: &MatchOutcome, beer: &MatchOutcome) -> bool {
        match self {
            Self::None => false,
            Self::Perfect => brewery.is_perfect() && beer.is_perfect(),
            Self::All => beer.is_match(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Only process old breweries, or old beers, whose normalized name matches
    pub filter: Option<Regex>,
    pub consume: ConsumePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub old_breweries: usize,
    pub old_beers: usize,
    pub skipped_breweries: usize,
    pub brewery_matches: usize,
    pub beer_matches: usize,
    /// Beers matched with +inf at both tiers
    pub perfect_matches: usize,
    pub cache_hits: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub generated_at: String,
    pub summary: ReconcileSummary,
    pub breweries: Vec<BreweryResolution>,
}

/// Matches every old brewery and beer, in old-catalog order.
///
/// Frequencies are counted once from both full catalogs when the reconciler
/// is created and are not recounted as beers are consumed.
pub struct Reconciler<'a> {
    old: &'a Catalog,
    new: &'a Catalog,
    model: FrequencyModel,
    config: MatchingConfig,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        old: &'a Catalog,
        new: &'a Catalog,
        config: MatchingConfig,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            old,
            new,
            model: FrequencyModel::build(old, new),
            config,
            options,
        }
    }

    pub fn run(&self, cache: &mut dyn ResolutionCache) -> ReconcileReport {
        let engine = MatchingEngine::with_config(self.new, &self.model, self.config.clone());
        let mut consumed: HashSet<RecordId> = HashSet::new();
        let mut summary = ReconcileSummary::default();
        let mut breweries = Vec::new();

        for old_brewery in &self.old.breweries {
            let Some(old_beers) = self.selected_beers(old_brewery) else {
                summary.skipped_breweries += 1;
                continue;
            };
            summary.old_breweries += 1;

            let outcome = engine.match_brewery(old_brewery);
            if outcome.is_match() {
                summary.brewery_matches += 1;
            }

            let mut beers = Vec::with_capacity(old_beers.len());
            for old_beer in old_beers {
                summary.old_beers += 1;

                let beer_outcome = if !outcome.is_match() {
                    MatchOutcome::NoMatch
                } else if let Some(replayed) =
                    self.replay(&engine, &*cache, old_beer, &outcome, &consumed)
                {
                    summary.cache_hits += 1;
                    replayed
                } else {
                    engine.match_beer_with(old_beer, &outcome, &|id| !consumed.contains(id))
                };

                if let MatchOutcome::Matched { record, source, .. } = &beer_outcome {
                    summary.beer_matches += 1;
                    let perfect = outcome.is_perfect() && beer_outcome.is_perfect();
                    if perfect {
                        summary.perfect_matches += 1;
                        if *source == MatchSource::Scored {
                            cache.put(&old_beer.id, &record.id);
                        }
                    }
                    if self.options.consume.consumes(&outcome, &beer_outcome) {
                        consumed.insert(record.id.clone());
                    }
                }

                beers.push(engine.beer_resolution(old_beer, &outcome, beer_outcome));
            }

            debug!(
                brewery = %old_brewery.raw_name,
                matched = outcome.is_match(),
                beers = beers.len(),
                "Resolved brewery"
            );

            breweries.push(BreweryResolution {
                old_brewery: RecordRef::from_brewery(old_brewery),
                outcome,
                beers,
            });
        }

        info!(
            breweries = summary.old_breweries,
            beers = summary.old_beers,
            brewery_matches = summary.brewery_matches,
            beer_matches = summary.beer_matches,
            perfect = summary.perfect_matches,
            cache_hits = summary.cache_hits,
            "Reconciliation complete"
        );

        ReconcileReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
            breweries,
        }
    }

    /// Beers of `brewery` to process, or None to skip the brewery entirely
    fn selected_beers<'b>(&self, brewery: &'b BreweryRecord) -> Option<Vec<&'b BeerRecord>> {
        match &self.options.filter {
            Some(filter) if !filter.is_match(&brewery.name) => {
                let beers: Vec<_> = brewery
                    .beers
                    .iter()
                    .filter(|beer| filter.is_match(&beer.name))
                    .collect();
                if beers.is_empty() {
                    None
                } else {
                    Some(beers)
                }
            }
            _ => Some(brewery.beers.iter().collect()),
        }
    }

    /// Cached resolution for `old_beer`, if it still points at an available
    /// new beer listed under the matched brewery
    fn replay(
        &self,
        engine: &MatchingEngine<'_>,
        cache: &dyn ResolutionCache,
        old_beer: &BeerRecord,
        brewery: &MatchOutcome,
        consumed: &HashSet<RecordId>,
    ) -> Option<MatchOutcome> {
        let new_id = cache.get(&old_beer.id)?;

        if consumed.contains(&new_id) {
            debug!(old = %old_beer.id, new = %new_id, "Cached match already consumed");
            return None;
        }

        let new_beer = engine
            .owning_brewery(brewery, &new_id)
            .and_then(|owner| owner.beers.iter().find(|beer| beer.id == new_id));
        let Some(new_beer) = new_beer else {
            if self.new.find_beer(&new_id).is_some() {
                warn!(
                    old = %old_beer.id,
                    new = %new_id,
                    "Cached match is not listed under the matched brewery; rescoring"
                );
            } else {
                warn!(
                    old = %old_beer.id,
                    new = %new_id,
                    "Cached match points at a beer missing from the new catalog; rescoring"
                );
            }
            return None;
        };

        Some(MatchOutcome::Matched {
            record: RecordRef::from_beer(new_beer),
            score: f64::INFINITY,
            source: MatchSource::Cache,
        })
    }
}
