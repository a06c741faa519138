//! Error types for siting-output.

use thiserror::Error;

use siting_network::NetworkError;

/// Errors that can occur when assembling, exporting or restoring results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A result row or snapshot refers to a node the network does not have,
    /// or a restored matrix is malformed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A snapshot parsed as JSON but does not describe a dense node range.
    #[error("malformed snapshot: {0}")]
    Snapshot(String),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
