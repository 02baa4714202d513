use thiserror::Error;

/// Failures surfaced by replay operations.
///
/// Every failure travels as a value: a `Failed` state variant, an event
/// payload, or a save-callback result. The core never panics on a failed
/// operation and never retries one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("recording API not available: {0}")]
    Unavailable(String),

    #[error("no finished recording is available")]
    PreviewUnavailable,

    #[error("storage permission has not been granted")]
    PermissionUnavailable,

    #[error("storage error: {0}")]
    StorageError(String),
}
