//! Error types for report configuration and exports
//! The pipeline itself never fails on malformed text; only option parsing and
//! writing exports can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown sort field: {0:?}")]
    UnknownSortField(String),

    #[error("unknown export format: {0:?} (expected json, csv or xml)")]
    UnknownExportFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
