//! Error types for loading the launch record store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for record store operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while loading launch records. All of them are fatal at
/// startup: the dashboard never serves without a valid store.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: outcome class must be 0 or 1, got {value}")]
    InvalidOutcome { line: u64, value: i64 },

    #[error("line {line}: payload mass must be a non-negative number, got {value}")]
    InvalidPayload { line: u64, value: f64 },

    #[error("line {line}: launch site is empty")]
    MissingSite { line: u64 },

    #[error("no launch records found")]
    Empty,
}
