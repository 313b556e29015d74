use plotters::prelude::*;
use veille_parser::Sentiment;

use crate::aggregate::SentimentDistribution;

use super::{count_ceiling, sentiment_color, RenderError, DESC_SIZE, FONT, LABEL_SIZE, TITLE_SIZE};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const BAR_GAP: u32 = 12;

/// Vertical bar per vocabulary label, zero-height bars included.
pub fn sentiment_distribution_svg(
    distribution: &SentimentDistribution,
) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_count = distribution.counts.iter().copied().max().unwrap_or(0);
        let last = Sentiment::ORDERED.len() - 1;

        // Integer ranges are inclusive, so `0..last` gives one segment per label.
        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Répartition globale des sentiments",
                (FONT, TITLE_SIZE).into_font().style(FontStyle::Bold),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0..last).into_segmented(), 0u64..count_ceiling(max_count))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(Sentiment::ORDERED.len())
            .x_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(idx) => Sentiment::ORDERED
                    .get(*idx)
                    .map(Sentiment::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            })
            .x_desc("Sentiment")
            .y_desc("Nombre d'articles")
            .label_style((FONT, LABEL_SIZE))
            .axis_desc_style((FONT, DESC_SIZE))
            .draw()?;

        chart.draw_series(distribution.iter().enumerate().map(
            |(idx, (sentiment, count))| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(idx), 0),
                        (SegmentValue::Exact(idx + 1), count),
                    ],
                    sentiment_color(sentiment).filled(),
                );
                bar.set_margin(0, 0, BAR_GAP, BAR_GAP);
                bar
            },
        ))?;

        root.present()?;
    }
    Ok(svg)
}
