//! In-memory implementations of the persistence traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{
    ChatMessage, MessageContent, MessageStore, Order, OrderId, OrderStore, Principal, StoreError,
};

/// HashMap-backed order store, seeded at startup.
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, order: Order) {
        let mut orders = self.orders.lock().await;
        orders.insert(order.id, order);
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.lock().await;
        Ok(orders.get(&id).cloned())
    }
}

/// Append-only message store. Timestamps come from the injected clock.
pub struct InMemoryMessageStore {
    clock: Arc<dyn Clock>,
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything stored so far, in insertion order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        let messages = self.messages.lock().await;
        messages.clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(
        &self,
        order: &Order,
        sender: &Principal,
        content: MessageContent,
    ) -> Result<ChatMessage, StoreError> {
        let message = ChatMessage {
            order_id: order.id,
            sender: sender.clone(),
            content,
            timestamp: self.clock.now_utc(),
        };
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(message)
    }
}
