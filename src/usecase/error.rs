//! Use case error types.

use thiserror::Error;

use crate::domain::StoreError;

/// Why a connection was not admitted to an order's room.
///
/// `OrderNotFound` and `Forbidden` are deliberately collapsed to the same
/// response at the transport layer so clients cannot enumerate order ids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("order not found")]
    OrderNotFound,
    #[error("user is not a participant in this order")]
    Forbidden,
    #[error("order lookup failed: {0}")]
    Lookup(#[from] StoreError),
}

/// Why an inbound message was not delivered.
#[derive(Debug, Error)]
pub enum SendMessageError {
    /// The external store rejected the write; nothing was broadcast.
    #[error("message was not persisted: {0}")]
    Persistence(StoreError),
    #[error("failed to encode outbound event: {0}")]
    Encode(#[from] serde_json::Error),
}
