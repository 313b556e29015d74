use std::path::PathBuf;

use crate::config::{Config, Variant};

#[derive(Debug, Clone)]
pub struct AppState {
    pub variant: Variant,
    /// Only written by [`Variant::Local`].
    pub report_path: PathBuf,
}

impl AppState {
    pub fn new(variant: Variant, report_path: impl Into<PathBuf>) -> Self {
        Self {
            variant,
            report_path: report_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.variant, config.report_path.clone())
    }

    /// Destination for the report copy, if this variant keeps one.
    pub fn persist_target(&self) -> Option<PathBuf> {
        match self.variant {
            Variant::Filtered => None,
            Variant::Local => Some(self.report_path.clone()),
        }
    }
}
