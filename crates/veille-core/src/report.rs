use html_escape::encode_text;

use crate::aggregate::Kpis;
use crate::charts::ReportCharts;

const UNKNOWN_BOUND: &str = "n.d.";

pub const TIMELINE_WIDTH: u32 = 700;
pub const DISTRIBUTION_WIDTH: u32 = 600;
pub const AUTHORS_WIDTH: u32 = 700;

/// Everything interpolated into the HTML document.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Only set when the report was filtered by author.
    pub selected_authors: Option<&'a [String]>,
    pub kpis: &'a Kpis,
    pub charts: &'a ReportCharts,
}

fn format_bound(bound: Option<i32>) -> String {
    bound.map_or_else(|| UNKNOWN_BOUND.to_string(), |year| year.to_string())
}

/// Builds the self-contained report document with the charts inlined as data URIs.
pub fn compose_html(ctx: &ReportContext<'_>) -> String {
    let period = format!("{} - {}", format_bound(ctx.min_year), format_bound(ctx.max_year));

    let authors_line = ctx
        .selected_authors
        .map(|authors| {
            let joined = authors
                .iter()
                .map(|author| encode_text(author).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            format!("\n    <p><strong>Auteurs sélectionnés :</strong> {joined}</p>")
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <title>Rapport de Veille Médiatique</title>
    <style>
        body {{ font-family: Arial, sans-serif; padding: 20px; }}
        h1 {{ color: #2F6690; }}
        .kpi {{ font-size: 18px; margin-bottom: 10px; }}
        .image {{ margin: 20px 0; }}
    </style>
</head>
<body>
    <h1>📊 Rapport de Veille Médiatique</h1>
    <p><strong>Période :</strong> {period}</p>{authors_line}
    <div class="kpi">
        <h2>🔢 Indicateurs Clés</h2>
        <ul>
            <li><strong>Mentions totales :</strong> {total}</li>
            <li><strong>Positives :</strong> {positive}</li>
            <li><strong>Négatives :</strong> {negative}</li>
            <li><strong>Neutres :</strong> {neutral}</li>
        </ul>
    </div>
    <div class="image">
        <h2>📈 Évolution des mentions</h2>
        <img src="{timeline}" width="{TIMELINE_WIDTH}"/>
    </div>
    <div class="image">
        <h2>📊 Répartition globale des sentiments</h2>
        <img src="{distribution}" width="{DISTRIBUTION_WIDTH}"/>
    </div>
    <div class="image">
        <h2>📊 Répartition des sentiments par auteur</h2>
        <img src="{authors}" width="{AUTHORS_WIDTH}"/>
    </div>
    <p style="margin-top: 40px; font-size: 12px; color: #999;">Généré automatiquement</p>
</body>
</html>
"#,
        total = ctx.kpis.total_mentions,
        positive = ctx.kpis.positive,
        negative = ctx.kpis.negative,
        neutral = ctx.kpis.neutral,
        timeline = ctx.charts.mentions_over_time.data_uri(),
        distribution = ctx.charts.sentiment_distribution.data_uri(),
        authors = ctx.charts.author_sentiment.data_uri(),
    )
}
