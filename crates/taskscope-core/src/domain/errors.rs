//! Errors - エラー型と分類
//!
//! Every core operation returns `ScopeError`. Transports only need `kind()` to
//! pick a status code; the variants carry the detail for messages and logs.

use thiserror::Error;

use super::ids::EntityKind;

/// ErrorKind は運用上の分類
///
/// - NotFound: the record does not exist (never retried)
/// - InvalidArgument: the caller sent something unusable (never retried)
/// - Unavailable: the store could not be reached or returned garbage
/// - Cancelled: the caller gave up (cancellation or deadline)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Unavailable,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("no job, chain, or group found with ID: {id}")]
    NoMatch { id: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported broker type: {0} (must be redis or in-memory)")]
    UnsupportedBackend(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl ScopeError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        ScopeError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ScopeError::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScopeError::NotFound { .. } | ScopeError::NoMatch { .. } => ErrorKind::NotFound,
            ScopeError::InvalidArgument(_) | ScopeError::UnsupportedBackend(_) => {
                ErrorKind::InvalidArgument
            }
            ScopeError::BackendUnavailable(_) | ScopeError::Corrupt { .. } => {
                ErrorKind::Unavailable
            }
            ScopeError::Cancelled | ScopeError::DeadlineExceeded => ErrorKind::Cancelled,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<redis::RedisError> for ScopeError {
    fn from(err: redis::RedisError) -> Self {
        ScopeError::BackendUnavailable(err.to_string())
    }
}
