use serde::{Deserialize, Serialize};

use crate::catalog::frequency::{CorpusFrequencies, FrequencyModel, FrequencyTable};
use crate::core::normalize::{bigram_set, tokenize, word_set};
use crate::core::types::{serialize_score, NameKind, Side};

/// Safely convert usize to f64 for frequency arithmetic
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Mean of a token's old-side and new-side counts. A zero mean counts as 1.
fn average_frequency(old: &FrequencyTable, new: &FrequencyTable, token: &str) -> f64 {
    let average = count_to_f64(old.get(token) + new.get(token)) / 2.0;
    if average == 0.0 {
        1.0
    } else {
        average
    }
}

fn is_unique_on_both_sides(old: &FrequencyTable, new: &FrequencyTable, token: &str) -> bool {
    old.get(token) == 1 && new.get(token) == 1
}

/// Configurable weights for the scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Credit per shared word, divided by the word's average frequency
    pub shared_word: f64,
    /// Penalty per word present on one side only, divided likewise
    pub unshared_word: f64,
    /// Credit per shared adjacent word pair, divided by the pair's average frequency
    pub shared_bigram: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            shared_word: 1.0,
            unshared_word: 2.0,
            shared_bigram: 5.0,
        }
    }
}

/// Why a similarity came out the way it did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum ScoreReason {
    /// One of the names has no tokens; blank names never match
    Blank,
    /// Both names are identical
    IdenticalNames,
    /// A word occurring in exactly one name on each side is shared
    UniqueSharedWord(String),
    /// A word pair occurring in exactly one name on each side is shared
    UniqueSharedBigram(String),
    /// Sum of the word and bigram scores
    Accumulated,
}

/// Similarity between two normalized names, with its components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityScore {
    #[serde(serialize_with = "serialize_score")]
    pub word_score: f64,
    #[serde(serialize_with = "serialize_score")]
    pub ngram_score: f64,
    #[serde(serialize_with = "serialize_score")]
    pub total: f64,
    pub reason: ScoreReason,
}

impl SimilarityScore {
    fn terminal(total: f64, reason: ScoreReason) -> Self {
        Self {
            word_score: 0.0,
            ngram_score: 0.0,
            total,
            reason,
        }
    }
}

/// Partial score, or a token that settles the comparison on its own
enum Evidence {
    Score(f64),
    Unique(String),
}

/// Frequency-weighted similarity of names from the old and new catalogs.
///
/// The score is symmetric: sets are walked in sorted order and every lookup
/// reads both the old and the new table, so `similarity(a, b) == similarity(b, a)`
/// holds bit for bit.
#[derive(Debug, Clone)]
pub struct SimilarityScorer<'a> {
    model: &'a FrequencyModel,
    weights: ScoringWeights,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(model: &'a FrequencyModel) -> Self {
        Self::with_weights(model, ScoringWeights::default())
    }

    pub fn with_weights(model: &'a FrequencyModel, weights: ScoringWeights) -> Self {
        Self { model, weights }
    }

    /// Similarity of an old-catalog name and a new-catalog name. May be `+inf`.
    #[must_use]
    pub fn similarity(&self, old_name: &str, new_name: &str, kind: NameKind) -> f64 {
        self.score_detail(old_name, new_name, kind).total
    }

    /// Similarity with its word and bigram components
    #[must_use]
    pub fn score_detail(&self, old_name: &str, new_name: &str, kind: NameKind) -> SimilarityScore {
        if tokenize(old_name).is_empty() || tokenize(new_name).is_empty() {
            return SimilarityScore::terminal(0.0, ScoreReason::Blank);
        }
        if old_name == new_name {
            return SimilarityScore::terminal(f64::INFINITY, ScoreReason::IdenticalNames);
        }

        let old = self.model.corpus(Side::Old, kind);
        let new = self.model.corpus(Side::New, kind);

        let word_score = match self.word_score(old_name, new_name, old, new) {
            Evidence::Score(score) => score,
            Evidence::Unique(word) => {
                return SimilarityScore {
                    word_score: f64::INFINITY,
                    ngram_score: 0.0,
                    total: f64::INFINITY,
                    reason: ScoreReason::UniqueSharedWord(word),
                };
            }
        };

        let ngram_score = match self.ngram_score(old_name, new_name, old, new) {
            Evidence::Score(score) => score,
            Evidence::Unique(bigram) => {
                return SimilarityScore {
                    word_score,
                    ngram_score: f64::INFINITY,
                    total: f64::INFINITY,
                    reason: ScoreReason::UniqueSharedBigram(bigram),
                };
            }
        };

        SimilarityScore {
            word_score,
            ngram_score,
            total: word_score + ngram_score,
            reason: ScoreReason::Accumulated,
        }
    }

    /// Shared rare words count for a match; one-sided words count against it,
    /// both normalized by the size of the combined vocabulary.
    fn word_score(
        &self,
        old_name: &str,
        new_name: &str,
        old: &CorpusFrequencies,
        new: &CorpusFrequencies,
    ) -> Evidence {
        let old_words = word_set(old_name);
        let new_words = word_set(new_name);

        let vocabulary = old_words.union(&new_words).count();
        if vocabulary == 0 {
            return Evidence::Score(0.0);
        }
        let vocabulary = count_to_f64(vocabulary);

        let mut positive = 0.0;
        for word in old_words.intersection(&new_words) {
            if is_unique_on_both_sides(&old.words, &new.words, word) {
                return Evidence::Unique((*word).to_string());
            }
            positive += self.weights.shared_word / average_frequency(&old.words, &new.words, word);
        }
        positive /= vocabulary;

        let mut negative = 0.0;
        for word in old_words.symmetric_difference(&new_words) {
            negative += self.weights.unshared_word / average_frequency(&old.words, &new.words, word);
        }
        negative /= vocabulary;

        Evidence::Score(positive - negative)
    }

    /// Bonus for shared adjacent word pairs. Not normalized, so several rare
    /// shared phrases add up.
    fn ngram_score(
        &self,
        old_name: &str,
        new_name: &str,
        old: &CorpusFrequencies,
        new: &CorpusFrequencies,
    ) -> Evidence {
        let old_bigrams = bigram_set(old_name);
        let new_bigrams = bigram_set(new_name);

        let mut score = 0.0;
        for bigram in old_bigrams.intersection(&new_bigrams) {
            if is_unique_on_both_sides(&old.bigrams, &new.bigrams, bigram) {
                return Evidence::Unique(bigram.clone());
            }
            score += self.weights.shared_bigram / average_frequency(&old.bigrams, &new.bigrams, bigram);
        }

        Evidence::Score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn beer_model(old: &[&str], new: &[&str]) -> FrequencyModel {
        FrequencyModel::new(
            CorpusFrequencies::default(),
            CorpusFrequencies::default(),
            CorpusFrequencies::build(old.iter().copied()),
            CorpusFrequencies::build(new.iter().copied()),
        )
    }

    const STYLES: [&str; 6] = [
        "amber ale",
        "amber lager",
        "oak ale",
        "oak lager",
        "oak stout",
        "oak porter",
    ];

    #[test]
    fn test_identical_names_are_perfect() {
        let model = FrequencyModel::default();
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail("dortmunder gold", "dortmunder gold", NameKind::Beer);
        assert_eq!(score.total, f64::INFINITY);
        assert_eq!(score.reason, ScoreReason::IdenticalNames);
    }

    #[test]
    fn test_blank_names_never_match() {
        let model = FrequencyModel::default();
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail("", "", NameKind::Beer);
        assert!(score.total.abs() < EPSILON);
        assert_eq!(score.reason, ScoreReason::Blank);
        assert!(scorer.similarity("oatmeal stout", " ", NameKind::Beer).abs() < EPSILON);
    }

    #[test]
    fn test_names_without_tokens_are_blank() {
        let model = FrequencyModel::default();
        let scorer = SimilarityScorer::new(&model);

        // "Brewing-Brewery" normalizes to a lone delimiter
        let name = crate::core::normalize::normalize_brewery("Brewing-Brewery");
        assert!(tokenize(&name).is_empty());

        let score = scorer.score_detail(&name, &name, NameKind::Brewery);
        assert_eq!(score.reason, ScoreReason::Blank);
        assert!(score.total.abs() < EPSILON);
        assert!(scorer.similarity("- -", "-", NameKind::Beer).abs() < EPSILON);
    }

    #[test]
    fn test_unique_shared_word_short_circuits() {
        let model = beer_model(
            &["bourbon barrel stout", "barrel aged porter", "oatmeal stout"],
            &["bourbon barrel stout reserve", "barrel aged porter", "oatmeal stout"],
        );
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail(
            "bourbon barrel stout",
            "bourbon barrel stout reserve",
            NameKind::Beer,
        );
        assert_eq!(score.total, f64::INFINITY);
        assert_eq!(score.reason, ScoreReason::UniqueSharedWord("bourbon".to_string()));
    }

    #[test]
    fn test_unique_shared_bigram_short_circuits() {
        let model = beer_model(&["oak red porter", "red oak ale"], &["oak red stout", "red oak lager"]);
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail("oak red porter", "oak red stout", NameKind::Beer);
        assert_eq!(score.total, f64::INFINITY);
        assert_eq!(score.reason, ScoreReason::UniqueSharedBigram("oak red".to_string()));
        assert!((score.word_score - (-1.75)).abs() < EPSILON);
    }

    #[test]
    fn test_word_and_bigram_components() {
        let corpus = ["red oak ale", "red oak lager", "oak red porter"];
        let model = beer_model(&corpus, &corpus);
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail("red oak ale", "red oak lager", NameKind::Beer);
        // oak and red: 1/3 each over 4 words; ale and lager: 2/1 each over 4 words
        assert!((score.word_score - (1.0 / 6.0 - 1.0)).abs() < EPSILON);
        // "red oak" appears in two names per side
        assert!((score.ngram_score - 2.5).abs() < EPSILON);
        assert!((score.total - (2.5 + 1.0 / 6.0 - 1.0)).abs() < EPSILON);
        assert_eq!(score.reason, ScoreReason::Accumulated);
    }

    #[test]
    fn test_custom_weights() {
        let corpus = ["red oak ale", "red oak lager", "oak red porter"];
        let model = beer_model(&corpus, &corpus);
        let weights = ScoringWeights {
            shared_bigram: 10.0,
            ..ScoringWeights::default()
        };
        let scorer = SimilarityScorer::with_weights(&model, weights);

        let score = scorer.score_detail("red oak ale", "red oak lager", NameKind::Beer);
        assert!((score.ngram_score - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_frequencies_count_as_one() {
        let model = FrequencyModel::default();
        let scorer = SimilarityScorer::new(&model);

        // alpha shared (1/1) over 3 words, beta and gamma one-sided (2/1 each) over 3 words
        let score = scorer.similarity("alpha beta", "alpha gamma", NameKind::Beer);
        assert!((score - (-1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_only_ignored_words() {
        let model = FrequencyModel::default();
        let scorer = SimilarityScorer::new(&model);

        let score = scorer.score_detail("the", "and of", NameKind::Beer);
        assert!(score.word_score.abs() < EPSILON);
        assert!(score.ngram_score.abs() < EPSILON);
    }

    #[test]
    fn test_rarer_shared_word_scores_higher() {
        let model = beer_model(&STYLES, &STYLES);
        let scorer = SimilarityScorer::new(&model);

        // amber is in 2 names per side, oak in 4
        let rare = scorer.similarity("amber ale", "amber lager", NameKind::Beer);
        let common = scorer.similarity("oak ale", "oak lager", NameKind::Beer);

        assert!((rare - (-0.5)).abs() < EPSILON);
        assert!((common - (-7.0 / 12.0)).abs() < EPSILON);
        assert!(rare > common);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let model = beer_model(&STYLES, &["amber ale", "oak stout", "red oak ale", "the oak porter"]);
        let scorer = SimilarityScorer::new(&model);

        let pairs = [
            ("amber ale", "oak ale"),
            ("oak stout", "the oak porter"),
            ("red oak ale", "amber lager"),
            ("oak porter", "oak stout"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                scorer.similarity(a, b, NameKind::Beer),
                scorer.similarity(b, a, NameKind::Beer),
                "similarity of {a:?} and {b:?} is not symmetric"
            );
        }
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert!((weights.shared_word - 1.0).abs() < EPSILON);
        assert!((weights.unshared_word - 2.0).abs() < EPSILON);
        assert!((weights.shared_bigram - 5.0).abs() < EPSILON);
    }
}
