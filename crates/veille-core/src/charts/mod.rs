mod authors;
mod distribution;
mod raster;
mod timeline;

use plotters::drawing::DrawingAreaErrorKind;
use plotters::style::RGBColor;
use thiserror::Error;
use tracing::debug;
use veille_parser::Sentiment;

use crate::aggregate::{AuthorSentimentMatrix, SentimentDistribution, TimeSeries};

pub use authors::author_sentiment_svg;
pub use distribution::sentiment_distribution_svg;
pub use raster::rasterize;
pub use timeline::mentions_over_time_svg;

/// One colour per vocabulary label, in [`Sentiment::ORDERED`] order.
pub const PALETTE: [RGBColor; 5] = [
    RGBColor(0x81, 0xC3, 0xD7),
    RGBColor(0x21, 0x9E, 0xBC),
    RGBColor(0xD9, 0xDC, 0xD6),
    RGBColor(0x2F, 0x66, 0x90),
    RGBColor(0x16, 0x42, 0x5B),
];
pub const LINE_COLOR: RGBColor = RGBColor(0x2F, 0x66, 0x90);

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const TITLE_SIZE: f64 = 18.0;
pub(crate) const DESC_SIZE: f64 = 13.0;
pub(crate) const LABEL_SIZE: f64 = 11.0;

pub fn sentiment_color(sentiment: Sentiment) -> RGBColor {
    PALETTE[sentiment.position()]
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Plot(String),

    #[error("invalid SVG document: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("could not allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Plot(err.to_string())
    }
}

/// Makes a data value fit for chart text. Characters XML cannot carry are dropped,
/// line breaks become spaces, and labels longer than `max_chars` end with an ellipsis.
pub(crate) fn chart_label(label: &str, max_chars: usize) -> String {
    let cleaned: Vec<char> = label
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => None,
            c => Some(c),
        })
        .collect();

    if cleaned.len() <= max_chars {
        return cleaned.into_iter().collect();
    }
    let mut kept: String = cleaned[..max_chars.saturating_sub(1)].iter().collect();
    kept.push('…');
    kept
}

/// Upper bound of a count axis, leaving headroom above the tallest value.
pub(crate) fn count_ceiling(max: u64) -> u64 {
    max + max / 10 + 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub png_base64: String,
}

impl ChartImage {
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.png_base64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCharts {
    pub mentions_over_time: ChartImage,
    pub sentiment_distribution: ChartImage,
    pub author_sentiment: ChartImage,
}

pub fn render_charts(
    series: &TimeSeries,
    distribution: &SentimentDistribution,
    matrix: &AuthorSentimentMatrix,
) -> Result<ReportCharts, RenderError> {
    let mentions_over_time = rasterize(&mentions_over_time_svg(series)?)?;
    let sentiment_distribution = rasterize(&sentiment_distribution_svg(distribution)?)?;
    let author_sentiment = rasterize(&author_sentiment_svg(matrix)?)?;

    debug!(
        timeline_bytes = mentions_over_time.png_base64.len(),
        distribution_bytes = sentiment_distribution.png_base64.len(),
        authors_bytes = author_sentiment.png_base64.len(),
        "charts rendered"
    );

    Ok(ReportCharts {
        mentions_over_time,
        sentiment_distribution,
        author_sentiment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_drop_characters_xml_rejects() {
        assert_eq!(chart_label("Le\u{1}Monde", 30), "LeMonde");
        assert_eq!(chart_label("Le\tMonde\r\n", 30), "Le Monde  ");
        assert_eq!(chart_label("a\u{b}b\u{fffe}c", 30), "abc");
        assert_eq!(chart_label("Libération", 30), "Libération");
    }

    #[test]
    fn long_labels_are_cut_with_an_ellipsis() {
        assert_eq!(chart_label("abcdefgh", 5), "abcd…");
        assert_eq!(chart_label("abcde", 5), "abcde");
        assert_eq!(chart_label("\u{1}abcde", 5), "abcde");
    }

    #[test]
    fn count_axis_leaves_headroom() {
        assert_eq!(count_ceiling(0), 1);
        assert_eq!(count_ceiling(7), 8);
        assert_eq!(count_ceiling(100), 111);
    }
}
