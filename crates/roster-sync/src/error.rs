//! Sync error types.

use roster_connector::ConnectorError;
use roster_connector_hr::HrError;
use thiserror::Error;

/// Result type alias using `SyncError`.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised by a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A record lacks the attribute used as its index key.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Input is unusable as a whole (e.g. empty).
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more directory writes failed; the run otherwise completed.
    #[error("{0} directory write(s) failed")]
    WriteFailures(usize),

    #[error("HR API error: {0}")]
    Hr(#[from] HrError),

    #[error("Directory error: {0}")]
    Directory(#[from] ConnectorError),
}

impl SyncError {
    /// Whether the failure came from a network call rather than the data.
    pub fn is_transport(&self) -> bool {
        match self {
            SyncError::Hr(e) => !matches!(e, HrError::Config(_)),
            SyncError::Directory(e) => e.is_transient(),
            _ => false,
        }
    }
}
