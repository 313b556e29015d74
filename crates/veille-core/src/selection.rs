use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use veille_parser::MentionRecord;

/// Inclusive calendar-year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

/// Observed year span of the records with a parseable timestamp.
pub fn observed_year_range(records: &[MentionRecord]) -> Option<YearRange> {
    records.iter().filter_map(MentionRecord::year).fold(None, |acc, year| {
        Some(match acc {
            None => YearRange {
                min: year,
                max: year,
            },
            Some(range) => YearRange {
                min: range.min.min(year),
                max: range.max.max(year),
            },
        })
    })
}

/// Distinct non-missing authors in order of first appearance.
pub fn distinct_authors(records: &[MentionRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.author.as_deref())
        .filter(|author| seen.insert(*author))
        .map(str::to_string)
        .collect()
}

/// Caller-supplied restriction. Every field is optional; see [`Selection::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub authors: Option<Vec<String>>,
}

/// A selection with its defaults filled in from the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub authors: Vec<String>,
}

impl Selection {
    /// Missing bounds take the observed min/max year; a missing allow-list takes every
    /// author present. A bound stays `None` only when no record carries a year.
    pub fn resolve(&self, records: &[MentionRecord]) -> ResolvedSelection {
        let observed = observed_year_range(records);
        ResolvedSelection {
            min_year: self.min_year.or(observed.map(|range| range.min)),
            max_year: self.max_year.or(observed.map(|range| range.max)),
            authors: self
                .authors
                .clone()
                .unwrap_or_else(|| distinct_authors(records)),
        }
    }
}

impl ResolvedSelection {
    pub fn matches(&self, record: &MentionRecord) -> bool {
        self.year_matches(record.year()) && self.author_matches(record.author.as_deref())
    }

    fn year_matches(&self, year: Option<i32>) -> bool {
        if self.min_year.is_none() && self.max_year.is_none() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.min_year.map_or(true, |min| year >= min) && self.max_year.map_or(true, |max| year <= max)
    }

    fn author_matches(&self, author: Option<&str>) -> bool {
        author.is_some_and(|name| self.authors.iter().any(|allowed| allowed == name))
    }

    pub fn apply(&self, records: Vec<MentionRecord>) -> Vec<MentionRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}
