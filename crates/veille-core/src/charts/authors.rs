use plotters::prelude::*;

use crate::aggregate::AuthorSentimentMatrix;

use super::{
    chart_label, count_ceiling, sentiment_color, RenderError, DESC_SIZE, FONT, LABEL_SIZE,
    TITLE_SIZE,
};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const MAX_AUTHOR_CHARS: usize = 30;

/// Horizontal stacked bars, one per author. Rows are drawn bottom-up in matrix order,
/// so the last row sits at the top.
pub fn author_sentiment_svg(matrix: &AuthorSentimentMatrix) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let rows = matrix.rows.len();
        let max_total = matrix
            .rows
            .iter()
            .map(|row| row.counts.iter().sum::<u64>())
            .max()
            .unwrap_or(0);
        let names: Vec<String> = matrix
            .rows
            .iter()
            .map(|row| chart_label(&row.author, MAX_AUTHOR_CHARS))
            .collect();

        // Integer ranges are inclusive: `0..rows - 1` holds one segment per author.
        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Répartition des sentiments par auteur",
                (FONT, TITLE_SIZE).into_font().style(FontStyle::Bold),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(230)
            .build_cartesian_2d(
                0u64..count_ceiling(max_total),
                (0..rows.max(1) - 1).into_segmented(),
            )?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.max(1))
            .y_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(idx) => names.get(*idx).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("Nombre d'articles")
            .y_desc("Auteur / Source")
            .label_style((FONT, LABEL_SIZE))
            .axis_desc_style((FONT, DESC_SIZE))
            .draw()?;

        let (_, plot_height) = chart.plotting_area().dim_in_pixel();
        let bar_margin = plot_height / (rows.max(1) as u32) / 4;

        for (col, sentiment) in matrix.columns.iter().enumerate() {
            let color = sentiment_color(*sentiment);
            chart
                .draw_series(matrix.rows.iter().enumerate().map(|(idx, row)| {
                    let start: u64 = row.counts.iter().take(col).sum();
                    let count = row.counts.get(col).copied().unwrap_or(0);
                    let mut segment = Rectangle::new(
                        [
                            (start, SegmentValue::Exact(idx)),
                            (start + count, SegmentValue::Exact(idx + 1)),
                        ],
                        color.filled(),
                    );
                    segment.set_margin(bar_margin, bar_margin, 0, 0);
                    segment
                }))?
                .label(sentiment.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if !matrix.columns.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .label_font((FONT, LABEL_SIZE))
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK.mix(0.3))
                .draw()?;
        }

        root.present()?;
    }
    Ok(svg)
}
