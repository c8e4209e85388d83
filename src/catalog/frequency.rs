//! Corpus statistics used to weight shared words by rarity.
//!
//! A word that appears in a single brewery name on each side is far better
//! evidence of a match than `ale` or `stout`. Frequencies are counted once per
//! run for each catalog side and name kind, and only read afterwards.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::core::normalize::{bigram_set, tokenize};
use crate::core::types::{NameKind, Side};

use super::store::Catalog;

/// Token -> number of names containing it. Absent tokens count 0.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    #[must_use]
    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    fn increment(&mut self, token: &str) {
        *self.counts.entry(token.to_string()).or_default() += 1;
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Unigram and bigram tables for one corpus of names
#[derive(Debug, Default, Clone)]
pub struct CorpusFrequencies {
    /// Number of distinct names containing each word
    pub words: FrequencyTable,

    /// Number of names (repeats included) containing each adjacent word pair
    pub bigrams: FrequencyTable,
}

impl CorpusFrequencies {
    /// Count words and bigrams over a corpus of normalized names.
    ///
    /// Word counts are taken over distinct names: a name listed twice
    /// contributes once. Bigram counts are taken over every name as given.
    /// Either way a name counts a token at most once.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut corpus = Self::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for name in names {
            for bigram in bigram_set(name) {
                corpus.bigrams.increment(&bigram);
            }

            if seen.insert(name) {
                let words: BTreeSet<&str> = tokenize(name).into_iter().collect();
                for word in words {
                    corpus.words.increment(word);
                }
            }
        }

        corpus
    }
}

/// The eight frequency tables of a run: {old, new} x {brewery, beer} x {word, bigram}
#[derive(Debug, Default, Clone)]
pub struct FrequencyModel {
    old_breweries: CorpusFrequencies,
    new_breweries: CorpusFrequencies,
    old_beers: CorpusFrequencies,
    new_beers: CorpusFrequencies,
}

impl FrequencyModel {
    pub fn new(
        old_breweries: CorpusFrequencies,
        new_breweries: CorpusFrequencies,
        old_beers: CorpusFrequencies,
        new_beers: CorpusFrequencies,
    ) -> Self {
        Self {
            old_breweries,
            new_breweries,
            old_beers,
            new_beers,
        }
    }

    /// Count every brewery and beer name of both catalogs
    pub fn build(old: &Catalog, new: &Catalog) -> Self {
        let model = Self::new(
            CorpusFrequencies::build(old.brewery_names()),
            CorpusFrequencies::build(new.brewery_names()),
            CorpusFrequencies::build(old.beer_names()),
            CorpusFrequencies::build(new.beer_names()),
        );

        debug!(
            old_brewery_words = model.old_breweries.words.len(),
            new_brewery_words = model.new_breweries.words.len(),
            old_beer_words = model.old_beers.words.len(),
            new_beer_words = model.new_beers.words.len(),
            "Built frequency model"
        );

        model
    }

    pub fn corpus(&self, side: Side, kind: NameKind) -> &CorpusFrequencies {
        match (side, kind) {
            (Side::Old, NameKind::Brewery) => &self.old_breweries,
            (Side::New, NameKind::Brewery) => &self.new_breweries,
            (Side::Old, NameKind::Beer) => &self.old_beers,
            (Side::New, NameKind::Beer) => &self.new_beers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::BreweryRecord;

    #[test]
    fn test_word_counts_use_distinct_names() {
        let corpus = CorpusFrequencies::build(["oak stout", "oak stout", "oak ale", "stout stout"]);

        // "oak stout" is counted once; "stout stout" counts stout once
        assert_eq!(corpus.words.get("oak"), 2);
        assert_eq!(corpus.words.get("stout"), 2);
        assert_eq!(corpus.words.get("ale"), 1);
        assert_eq!(corpus.words.get("porter"), 0);
    }

    #[test]
    fn test_bigram_counts_include_repeated_names() {
        let corpus = CorpusFrequencies::build(["oak stout", "oak stout", "fish and chips"]);

        assert_eq!(corpus.bigrams.get("oak stout"), 2);
        assert_eq!(corpus.bigrams.get("fish and"), 1);
        assert_eq!(corpus.bigrams.get("and chips"), 1);
        assert_eq!(corpus.bigrams.get("stout oak"), 0);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = CorpusFrequencies::build(std::iter::empty());
        assert!(corpus.words.is_empty());
        assert!(corpus.bigrams.is_empty());
    }

    #[test]
    fn test_model_keeps_sides_and_kinds_apart() {
        let old = Catalog::from_breweries([
            BreweryRecord::new("1", "Great Lakes Brewing").with_beer("10", "Dortmunder Gold")
        ]);
        let new = Catalog::from_breweries([
            BreweryRecord::new("a", "Great Lakes Brewing Co").with_beer("b", "Burning River")
        ]);
        let model = FrequencyModel::build(&old, &new);

        assert_eq!(model.corpus(Side::Old, NameKind::Brewery).words.get("lakes"), 1);
        assert_eq!(model.corpus(Side::New, NameKind::Brewery).words.get("lakes"), 1);
        assert_eq!(model.corpus(Side::Old, NameKind::Beer).words.get("gold"), 1);
        assert_eq!(model.corpus(Side::New, NameKind::Beer).words.get("gold"), 0);
        assert_eq!(model.corpus(Side::New, NameKind::Beer).bigrams.get("burning river"), 1);
    }
}
