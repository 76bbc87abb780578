//! Error types for linea

use thiserror::Error;

use crate::InstanceName;

/// Core linea errors. Duplicate and stale updates are not errors - they are
/// expected outcomes, reported through `RejectReason`.
#[derive(Error, Debug)]
pub enum LineaError {
    // Update errors
    #[error("malformed update: {0}")]
    MalformedUpdate(String),

    // Time errors
    #[error("timezone lookup failed: {0}")]
    TimezoneLookup(String),

    #[error("unparseable timestamp: {0}")]
    UnparseableTimestamp(String),

    // Backfill errors
    #[error("no history available for {0}")]
    NoHistory(InstanceName),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for linea operations
pub type LineaResult<T> = Result<T, LineaError>;
