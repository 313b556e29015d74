use polars::prelude::*;
use veille_parser::MentionRecord;

use crate::period::Granularity;

pub const AUTHOR: &str = "author";
pub const SENTIMENT: &str = "sentiment";
pub const PERIOD: &str = "period";
pub const COUNT: &str = "count";

/// Loads records into a frame with one row per mention: `author` (nullable),
/// `sentiment`, and `period` (nullable bucket label for the given granularity).
pub fn mentions_frame(
    records: &[MentionRecord],
    granularity: Granularity,
) -> Result<DataFrame, PolarsError> {
    let periods: Vec<Option<String>> = records
        .iter()
        .map(|record| record.created_at.map(|ts| granularity.bucket(ts)))
        .collect();

    let author = Series::new(
        AUTHOR.into(),
        records
            .iter()
            .map(|record| record.author.as_deref())
            .collect::<Vec<Option<&str>>>(),
    );
    let sentiment = Series::new(
        SENTIMENT.into(),
        records
            .iter()
            .map(|record| record.sentiment.as_str())
            .collect::<Vec<&str>>(),
    );
    let period = Series::new(
        PERIOD.into(),
        periods
            .iter()
            .map(|opt| opt.as_deref())
            .collect::<Vec<Option<&str>>>(),
    );

    DataFrame::new(vec![author.into(), sentiment.into(), period.into()])
}

/// Counts rows per distinct combination of `keys`, dropping rows where any key is null.
/// The result holds the key columns plus a `count` column.
pub fn count_by(df: &DataFrame, keys: &[&str]) -> Result<DataFrame, PolarsError> {
    let not_null = keys
        .iter()
        .fold(lit(true), |acc, key| acc.and(col(*key).is_not_null()));

    df.clone()
        .lazy()
        .filter(not_null)
        .group_by(keys.iter().map(|key| col(*key)).collect::<Vec<_>>())
        .agg([len().alias(COUNT)])
        .collect()
}

/// Reads the `count` column of a [`count_by`] result as `u64`s.
pub(crate) fn counts(df: &DataFrame) -> Result<Vec<u64>, PolarsError> {
    let column = df.column(COUNT)?.cast(&DataType::UInt64)?;
    let values = column.u64()?;
    Ok((0..df.height())
        .map(|idx| values.get(idx).unwrap_or(0))
        .collect())
}
