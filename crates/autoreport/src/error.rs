//! Error types for the autoreport library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no header to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Failure inside the optional insights stage.
    #[error("Insights error: {0}")]
    Insights(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
