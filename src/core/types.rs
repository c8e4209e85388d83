use serde::{Deserialize, Serialize, Serializer};

/// Catalog-local record identifier. Never compared across catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two catalogs a name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
        }
    }
}

/// The kind of name being normalized or scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    Brewery,
    Beer,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brewery => write!(f, "brewery"),
            Self::Beer => write!(f, "beer"),
        }
    }
}

/// Type of match found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Identical names or a uniquely shared word/phrase (score is +inf)
    Exact,
    /// Finite score above the threshold
    Fuzzy,
    /// No candidate cleared the threshold
    NoMatch,
}

impl MatchType {
    #[must_use]
    pub fn from_score(score: f64, min_score: f64) -> Self {
        if score == f64::INFINITY {
            Self::Exact
        } else if score > min_score {
            Self::Fuzzy
        } else {
            Self::NoMatch
        }
    }
}

/// Render a score for humans: `inf` for perfect matches, three decimals otherwise
#[must_use]
pub fn format_score(score: f64) -> String {
    if score.is_infinite() {
        if score > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{score:.3}")
    }
}

/// JSON has no infinity; perfect scores are written as the string `"inf"`.
pub fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if score.is_finite() {
        serializer.serialize_f64(*score)
    } else {
        serializer.serialize_str(&format_score(*score))
    }
}
