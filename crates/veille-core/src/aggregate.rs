use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{DataFrame, PolarsError};
use serde::{Deserialize, Serialize};
use veille_parser::{MentionRecord, Sentiment};

use crate::frame::{count_by, counts, AUTHOR, PERIOD, SENTIMENT};
use crate::period::Granularity;

/// Maximum number of authors kept in the per-author breakdown.
pub const TOP_AUTHORS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_mentions: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

pub fn compute_kpis(records: &[MentionRecord]) -> Kpis {
    let count = |label: &str| {
        records
            .iter()
            .filter(|record| record.sentiment == label)
            .count() as u64
    };

    Kpis {
        total_mentions: records.len() as u64,
        positive: count(Sentiment::Positive.as_str()),
        negative: count(Sentiment::Negative.as_str()),
        neutral: count(Sentiment::Neutral.as_str()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCount {
    pub period: String,
    pub count: u64,
}

/// Mention volume per period bucket, ascending, without gap-filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub points: Vec<PeriodCount>,
}

pub fn mentions_over_time(
    frame: &DataFrame,
    granularity: Granularity,
) -> Result<TimeSeries, PolarsError> {
    let grouped = count_by(frame, &[PERIOD])?;
    let periods = grouped.column(PERIOD)?.str()?;
    let values = counts(&grouped)?;

    let mut points: Vec<PeriodCount> = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, count)| {
            periods.get(idx).map(|period| PeriodCount {
                period: period.to_string(),
                count,
            })
        })
        .collect();
    points.sort_by(|a, b| a.period.cmp(&b.period));

    Ok(TimeSeries { granularity, points })
}

/// Counts per vocabulary label, indexed by [`Sentiment::position`]. Labels outside
/// the vocabulary are not represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub counts: [u64; 5],
}

impl SentimentDistribution {
    pub fn get(&self, sentiment: Sentiment) -> u64 {
        self.counts[sentiment.position()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sentiment, u64)> + '_ {
        Sentiment::ORDERED
            .into_iter()
            .map(move |sentiment| (sentiment, self.get(sentiment)))
    }
}

pub fn sentiment_distribution(frame: &DataFrame) -> Result<SentimentDistribution, PolarsError> {
    let grouped = count_by(frame, &[SENTIMENT])?;
    let labels = grouped.column(SENTIMENT)?.str()?;
    let values = counts(&grouped)?;

    let mut distribution = SentimentDistribution::default();
    for (idx, count) in values.into_iter().enumerate() {
        if let Some(sentiment) = labels.get(idx).and_then(|label| Sentiment::try_from(label).ok()) {
            distribution.counts[sentiment.position()] += count;
        }
    }
    Ok(distribution)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
    pub author: String,
    /// Aligned with [`AuthorSentimentMatrix::columns`].
    pub counts: Vec<u64>,
    /// Row total over every observed label, including non-vocabulary ones.
    pub total: u64,
}

/// Per-author sentiment breakdown of the busiest authors.
///
/// `rows` are in drawing order for a bottom-up horizontal chart: the author with the
/// highest total comes last. `columns` are the vocabulary labels present in the
/// counted data, in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSentimentMatrix {
    pub columns: Vec<Sentiment>,
    pub rows: Vec<AuthorRow>,
}

pub fn author_sentiment_matrix(frame: &DataFrame) -> Result<AuthorSentimentMatrix, PolarsError> {
    let grouped = count_by(frame, &[AUTHOR, SENTIMENT])?;
    let authors = grouped.column(AUTHOR)?.str()?;
    let labels = grouped.column(SENTIMENT)?.str()?;
    let values = counts(&grouped)?;

    let mut per_author: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    let mut observed_labels: BTreeSet<String> = BTreeSet::new();
    for (idx, count) in values.into_iter().enumerate() {
        let (Some(author), Some(label)) = (authors.get(idx), labels.get(idx)) else {
            continue;
        };
        observed_labels.insert(label.to_string());
        *per_author
            .entry(author.to_string())
            .or_default()
            .entry(label.to_string())
            .or_insert(0) += count;
    }

    let columns: Vec<Sentiment> = Sentiment::ORDERED
        .into_iter()
        .filter(|sentiment| observed_labels.contains(sentiment.as_str()))
        .collect();

    // BTreeMap iteration is alphabetical and the sort is stable, so equal totals
    // keep author-name order.
    let mut ranked: Vec<(String, BTreeMap<String, u64>, u64)> = per_author
        .into_iter()
        .map(|(author, by_label)| {
            let total = by_label.values().sum();
            (author, by_label, total)
        })
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2));
    ranked.truncate(TOP_AUTHORS);
    ranked.reverse();

    let rows = ranked
        .into_iter()
        .map(|(author, by_label, total)| AuthorRow {
            counts: columns
                .iter()
                .map(|sentiment| by_label.get(sentiment.as_str()).copied().unwrap_or(0))
                .collect(),
            author,
            total,
        })
        .collect();

    Ok(AuthorSentimentMatrix { columns, rows })
}
