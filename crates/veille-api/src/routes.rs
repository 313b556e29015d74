use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, info};
use veille_core::period::Granularity;
use veille_core::selection::Selection;
use veille_core::{generate_report, persist_report, ReportOutput, ReportRequest};

use crate::config::Variant;
use crate::error::ApiError;
use crate::AppState;

/// Raw multipart fields of an `/analyser` call.
#[derive(Debug, Default)]
struct AnalyseForm {
    file: Option<Vec<u8>>,
    selected_authors: Vec<String>,
    min_year: Option<String>,
    max_year: Option<String>,
    granularity: Option<String>,
}

impl AnalyseForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = Some(field.bytes().await?.to_vec()),
                "selected_authors" => form.selected_authors.push(field.text().await?),
                "min_year" => form.min_year = Some(field.text().await?),
                "max_year" => form.max_year = Some(field.text().await?),
                "granularity" => form.granularity = Some(field.text().await?),
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    /// Validates the form against the variant. The local variant never looks at filters.
    fn into_request(self, variant: Variant) -> Result<(Vec<u8>, ReportRequest), ApiError> {
        let csv = self.file.ok_or(ApiError::MissingField("file"))?;
        let granularity = self
            .granularity
            .as_deref()
            .map(Granularity::from_label)
            .unwrap_or_default();

        let selection = match variant {
            Variant::Local => None,
            Variant::Filtered => {
                let authors: Vec<String> = self
                    .selected_authors
                    .into_iter()
                    .filter(|author| !author.is_empty())
                    .collect();
                Some(Selection {
                    min_year: parse_year("min_year", self.min_year.as_deref())?,
                    max_year: parse_year("max_year", self.max_year.as_deref())?,
                    authors: (!authors.is_empty()).then_some(authors),
                })
            }
        };

        Ok((
            csv,
            ReportRequest {
                granularity,
                selection,
            },
        ))
    }
}

fn parse_year(field: &'static str, raw: Option<&str>) -> Result<Option<i32>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::InvalidInteger {
                field,
                value: value.to_string(),
            }),
    }
}

pub async fn analyser(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ReportOutput>, ApiError> {
    let form = AnalyseForm::read(multipart).await?;
    let (csv, request) = form.into_request(state.variant)?;
    let upload_bytes = csv.len();
    let persist_to = state.persist_target();

    let output = tokio::task::spawn_blocking(move || -> veille_core::Result<ReportOutput> {
        let output = generate_report(&csv, &request)?;
        if let Some(path) = persist_to {
            persist_report(&path, &output.html_report)?;
        }
        Ok(output)
    })
    .await??;

    info!(
        upload_bytes,
        total_mentions = output.kpis.total_mentions,
        variant = ?state.variant,
        "analysis served"
    );
    Ok(Json(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(min_year: Option<&str>) -> AnalyseForm {
        AnalyseForm {
            file: Some(b"authorName\n".to_vec()),
            selected_authors: vec![String::new(), "Le Monde".to_string()],
            min_year: min_year.map(str::to_string),
            max_year: Some(" ".to_string()),
            granularity: Some("Par semaine".to_string()),
        }
    }

    #[test]
    fn filtered_form_builds_a_selection() {
        let (_, request) = form(Some("2021")).into_request(Variant::Filtered).expect("valid form");
        assert_eq!(request.granularity, Granularity::Week);
        assert_eq!(
            request.selection,
            Some(Selection {
                min_year: Some(2021),
                max_year: None,
                authors: Some(vec!["Le Monde".to_string()]),
            })
        );
    }

    #[test]
    fn local_form_ignores_filters() {
        let (_, request) = form(Some("not a year"))
            .into_request(Variant::Local)
            .expect("filters are not validated");
        assert_eq!(request.selection, None);
    }

    #[test]
    fn bad_year_and_missing_file_are_rejected() {
        let err = form(Some("2O21")).into_request(Variant::Filtered).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInteger { field: "min_year", .. }));

        let missing = AnalyseForm::default().into_request(Variant::Local).unwrap_err();
        assert!(matches!(missing, ApiError::MissingField("file")));
    }
}
