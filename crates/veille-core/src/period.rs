use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Time-bucket size for the mention-volume series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Granularity {
    /// Maps a form label to a granularity. Unknown labels fall back to `Month`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Par jour" => Granularity::Day,
            "Par semaine" => Granularity::Week,
            "Par mois" => Granularity::Month,
            "Par année" => Granularity::Year,
            _ => Granularity::Month,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Par jour",
            Granularity::Week => "Par semaine",
            Granularity::Month => "Par mois",
            Granularity::Year => "Par année",
        }
    }

    /// Collapses a timestamp to the label of its bucket. Labels are zero-padded and
    /// begin with the bucket's first day, so they sort chronologically as strings.
    pub fn bucket(&self, ts: NaiveDateTime) -> String {
        let date = ts.date();
        match self {
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let start =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                let end = start + Duration::days(6);
                format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
            Granularity::Year => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(13, 45, 0))
            .unwrap()
    }

    #[test]
    fn labels_round_trip_and_unknown_falls_back_to_month() {
        for granularity in [
            Granularity::Day,
            Granularity::Week,
            Granularity::Month,
            Granularity::Year,
        ] {
            assert_eq!(Granularity::from_label(granularity.label()), granularity);
        }
        assert_eq!(Granularity::from_label("Par décennie"), Granularity::Month);
        assert_eq!(Granularity::from_label(""), Granularity::Month);
        assert_eq!(Granularity::from_label(" Par jour "), Granularity::Day);
        assert_eq!(Granularity::default(), Granularity::Month);
    }

    #[test]
    fn buckets_collapse_to_start_labels() {
        let ts = at(2024, 1, 5);
        assert_eq!(Granularity::Day.bucket(ts), "2024-01-05");
        assert_eq!(Granularity::Week.bucket(ts), "2024-01-01/2024-01-07");
        assert_eq!(Granularity::Month.bucket(ts), "2024-01");
        assert_eq!(Granularity::Year.bucket(ts), "2024");
    }

    #[test]
    fn weeks_start_on_monday_across_year_boundaries() {
        // 2021-01-03 is a Sunday.
        assert_eq!(
            Granularity::Week.bucket(at(2021, 1, 3)),
            "2020-12-28/2021-01-03"
        );
        assert_eq!(
            Granularity::Week.bucket(at(2021, 1, 4)),
            "2021-01-04/2021-01-10"
        );
    }
}
