use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use veille_parser::{parse_mentions, MentionRecord};

use crate::aggregate::{
    author_sentiment_matrix, compute_kpis, mentions_over_time, sentiment_distribution,
    AuthorSentimentMatrix, Kpis, SentimentDistribution, TimeSeries,
};
use crate::charts::render_charts;
use crate::error::Result;
use crate::frame::mentions_frame;
use crate::period::Granularity;
use crate::report::{compose_html, ReportContext};
use crate::selection::{observed_year_range, Selection};

/// Report configuration. Without a selection nothing is filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub granularity: Granularity,
    pub selection: Option<Selection>,
}

/// Numeric content of a report, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    pub kpis: Kpis,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// The resolved author allow-list when a selection was applied.
    pub selected_authors: Option<Vec<String>>,
    pub time_series: TimeSeries,
    pub distribution: SentimentDistribution,
    pub author_matrix: AuthorSentimentMatrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutput {
    pub kpis: Kpis,
    pub html_report: String,
}

/// Filters and aggregates parsed records.
pub fn analyse(records: Vec<MentionRecord>, request: &ReportRequest) -> Result<ReportData> {
    let ingested = records.len();

    let (records, min_year, max_year, selected_authors) = match &request.selection {
        Some(selection) => {
            let resolved = selection.resolve(&records);
            let kept = resolved.apply(records);
            (
                kept,
                resolved.min_year,
                resolved.max_year,
                Some(resolved.authors),
            )
        }
        None => {
            let observed = observed_year_range(&records);
            (
                records,
                observed.map(|range| range.min),
                observed.map(|range| range.max),
                None,
            )
        }
    };
    debug!(ingested, kept = records.len(), ?min_year, ?max_year, "selection applied");

    let kpis = compute_kpis(&records);
    let frame = mentions_frame(&records, request.granularity)?;
    let time_series = mentions_over_time(&frame, request.granularity)?;
    let distribution = sentiment_distribution(&frame)?;
    let author_matrix = author_sentiment_matrix(&frame)?;
    debug!(
        periods = time_series.points.len(),
        authors = author_matrix.rows.len(),
        "aggregates computed"
    );

    Ok(ReportData {
        kpis,
        min_year,
        max_year,
        selected_authors,
        time_series,
        distribution,
        author_matrix,
    })
}

/// Runs the whole pipeline on raw CSV bytes: ingest, filter, aggregate, render, compose.
pub fn generate_report(csv: &[u8], request: &ReportRequest) -> Result<ReportOutput> {
    let records = parse_mentions(csv)?;
    let rows = records.len();
    let data = analyse(records, request)?;

    let charts = render_charts(&data.time_series, &data.distribution, &data.author_matrix)?;
    let html_report = compose_html(&ReportContext {
        min_year: data.min_year,
        max_year: data.max_year,
        selected_authors: data.selected_authors.as_deref(),
        kpis: &data.kpis,
        charts: &charts,
    });

    info!(
        rows,
        total_mentions = data.kpis.total_mentions,
        granularity = %request.granularity,
        filtered = request.selection.is_some(),
        "report generated"
    );

    Ok(ReportOutput {
        kpis: data.kpis,
        html_report,
    })
}

/// Writes the report to `path`, replacing any previous file.
pub fn persist_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    info!(path = %path.display(), bytes = html.len(), "report written");
    Ok(())
}
