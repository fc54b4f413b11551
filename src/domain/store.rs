//! Persistence traits for the external collaborators.
//!
//! The chat core defines the interfaces it needs; concrete implementations
//! live in the infrastructure layer (dependency inversion). Orders are
//! read-only here, messages are append-only.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{ChatMessage, MessageContent, Order, OrderId, Principal, StoreError};

/// Read access to the external order/gig store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Look up an order by id. `Ok(None)` means the order does not exist;
    /// `Err` means the backend itself failed.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

/// Append access to the external message store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new chat message. The store assigns the timestamp; the
    /// returned message carries it for broadcast.
    async fn create_message(
        &self,
        order: &Order,
        sender: &Principal,
        content: MessageContent,
    ) -> Result<ChatMessage, StoreError>;
}
