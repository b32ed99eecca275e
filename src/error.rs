//! Error types for simulation requests.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Request-level failure of a simulation run.
///
/// Malformed data rows are not errors; they are dropped during ingestion.
/// Everything here fails the whole request.
#[derive(Debug, Error)]
pub enum SimError {
    /// The named object does not exist in the blob store.
    #[error("File not found: {filename}")]
    FileNotFound { filename: String },

    /// The request body or one of its path segments is unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The blob store failed for a reason other than a missing object.
    #[error("storage error reading \"{path}\": {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The run exceeded the configured request timeout.
    #[error("simulation timed out after {limit:?}")]
    Timeout { limit: Duration },
}

pub type Result<T> = std::result::Result<T, SimError>;
