use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use veille_core::ReportError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be an integer, got {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("report task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidInteger { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Multipart(err) => err.status(),
            ApiError::Report(ReportError::Parse(_)) => StatusCode::BAD_REQUEST,
            ApiError::Report(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "analysis failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
