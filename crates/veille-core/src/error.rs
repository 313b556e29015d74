use thiserror::Error;

use crate::charts::RenderError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV ingest failed: {0}")]
    Parse(#[from] veille_parser::ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Chart rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
