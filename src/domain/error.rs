//! Domain-level error types.

use thiserror::Error;

/// Validation failure for a chat message body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("message content is empty")]
    Empty,
    #[error("message content is too long ({0} characters)")]
    TooLong(usize),
}

/// Failure reported by an external persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
