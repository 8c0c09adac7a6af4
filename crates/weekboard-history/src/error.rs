//! History error types.

use thiserror::Error;

/// History engine error type.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// State could not be encoded or decoded as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persistence backend failed.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Index outside the history log.
    #[error("history index {index} out of range (log length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl HistoryError {
    /// Wrap a backend error.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
