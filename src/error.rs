//! Error types for request orchestration
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Request Error Enum ==
/// Error returned by every orchestration path.
///
/// `E` is the caller's own operation error, carried unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError<E> {
    /// The timer won the race against the operation. The operation itself
    /// keeps running in the background.
    #[error("Request timeout: {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Error produced by the operation
    #[error("{0}")]
    Operation(E),

    /// The spawned task panicked or was cancelled by the runtime
    #[error("Task aborted: {0}")]
    Aborted(String),
}

impl<E> RequestError<E> {
    /// Returns true if the error came from a timer rather than the operation.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout(_))
    }

    /// Returns the operation's own error, if that is what this is.
    pub fn into_operation(self) -> Option<E> {
        match self {
            RequestError::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Borrowing variant of [`RequestError::into_operation`].
    pub fn as_operation(&self) -> Option<&E> {
        match self {
            RequestError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<tokio::task::JoinError> for RequestError<E> {
    fn from(err: tokio::task::JoinError) -> Self {
        RequestError::Aborted(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for orchestration calls.
pub type Result<T, E> = std::result::Result<T, RequestError<E>>;
