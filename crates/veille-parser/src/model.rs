use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The fixed sentiment vocabulary. Variant order is the display order used for
/// chart colours and stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    StronglyPositive,
    Positive,
    Neutral,
    Negative,
    StronglyNegative,
}

impl Sentiment {
    pub const ORDERED: [Sentiment; 5] = [
        Sentiment::StronglyPositive,
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::StronglyNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::StronglyPositive => "strongly positive",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::StronglyNegative => "strongly negative",
        }
    }

    /// Index of this label in [`Sentiment::ORDERED`].
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Sentiment {
    type Error = String;

    /// Expects an already normalised label; see [`normalize_sentiment`].
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Sentiment::ORDERED
            .into_iter()
            .find(|sentiment| sentiment.as_str() == value)
            .ok_or_else(|| format!("unknown sentiment '{value}'"))
    }
}

/// Trims and lowercases a raw sentiment cell. No other cleansing is applied.
pub fn normalize_sentiment(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One row of the mention export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRecord {
    /// `None` when the source timestamp could not be parsed.
    pub created_at: Option<NaiveDateTime>,
    /// `None` when the source cell was empty.
    pub author: Option<String>,
    /// Normalised label, possibly outside the vocabulary.
    pub sentiment: String,
}

impl MentionRecord {
    pub fn new(
        created_at: Option<NaiveDateTime>,
        author: Option<String>,
        raw_sentiment: &str,
    ) -> Self {
        Self {
            created_at,
            author,
            sentiment: normalize_sentiment(raw_sentiment),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.created_at.map(|ts| ts.year())
    }

    pub fn vocabulary_sentiment(&self) -> Option<Sentiment> {
        Sentiment::try_from(self.sentiment.as_str()).ok()
    }
}
