use html_escape::encode_text;
use plotters::prelude::*;

use crate::aggregate::TimeSeries;

use super::{
    chart_label, count_ceiling, RenderError, DESC_SIZE, FONT, LABEL_SIZE, LINE_COLOR, TITLE_SIZE,
};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 400;
const MAX_X_LABELS: usize = 40;
const MAX_PERIOD_CHARS: usize = 32;

/// Anchor of one x label, in SVG pixels.
struct PeriodLabel {
    x: i32,
    y: i32,
    text: String,
}

/// Line chart of mention counts per period, one marker per point, x labels at 45°.
pub fn mentions_over_time_svg(series: &TimeSeries) -> Result<String, RenderError> {
    let mut svg = String::new();
    let labels = draw(&mut svg, series)?;
    Ok(with_period_labels(svg, &labels))
}

fn draw(svg: &mut String, series: &TimeSeries) -> Result<Vec<PeriodLabel>, RenderError> {
    let root = SVGBackend::with_string(svg, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = series.points.len();
    let max_count = series.points.iter().map(|point| point.count).max().unwrap_or(0);
    let title = format!(
        "Évolution des mentions ({})",
        series.granularity.label().to_lowercase()
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, TITLE_SIZE).into_font().style(FontStyle::Bold))
        .margin(15)
        .x_label_area_size(110)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), 0u64..count_ceiling(max_count))?;

    // Period labels are drawn separately: plotters only rotates text by quarter turns.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .x_desc("Période")
        .y_desc("Mentions")
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    let points: Vec<(f64, u64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(idx, point)| (idx as f64, point.count))
        .collect();
    chart.draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, LINE_COLOR.filled())),
    )?;

    let stride = n.div_ceil(MAX_X_LABELS).max(1);
    let labels = series
        .points
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(idx, point)| {
            let (x, y) = chart.backend_coord(&(idx as f64, 0));
            PeriodLabel {
                x,
                y: y + 10,
                text: chart_label(&point.period, MAX_PERIOD_CHARS),
            }
        })
        .collect();

    root.present()?;
    Ok(labels)
}

fn with_period_labels(mut svg: String, labels: &[PeriodLabel]) -> String {
    let overlay: String = labels
        .iter()
        .map(|label| {
            format!(
                r##"<text x="{x}" y="{y}" dy="0.5ex" text-anchor="end" font-family="{FONT}" font-size="{LABEL_SIZE}" fill="#000000" transform="rotate(-45, {x}, {y})">{text}</text>
"##,
                x = label.x,
                y = label.y,
                text = encode_text(&label.text),
            )
        })
        .collect();

    let end = svg.rfind("</svg>").unwrap_or(svg.len());
    svg.insert_str(end, &overlay);
    svg
}
