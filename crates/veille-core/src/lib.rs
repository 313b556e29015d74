pub mod aggregate;
pub mod charts;
pub mod error;
pub mod frame;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod selection;

pub use error::{ReportError, Result};
pub use pipeline::{analyse, generate_report, persist_report, ReportData, ReportOutput, ReportRequest};
