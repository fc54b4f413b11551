//! UseCase: persisting and fanning out a chat message.
//!
//! Persist-then-broadcast, strictly in that order: a message the store did
//! not accept is never fanned out, so recipients only ever see content that
//! exists in the message history.

use std::sync::Arc;

use crate::domain::{ChatMessage, ChatSession, MessageContent, MessageStore, RoomBroker};
use crate::infrastructure::dto::websocket::OutboundEvent;

use super::error::SendMessageError;

pub struct SendMessageUseCase {
    messages: Arc<dyn MessageStore>,
    broker: Arc<dyn RoomBroker>,
}

impl SendMessageUseCase {
    pub fn new(messages: Arc<dyn MessageStore>, broker: Arc<dyn RoomBroker>) -> Self {
        Self { messages, broker }
    }

    /// Persist `content` as a message on the session's order, then broadcast
    /// the resulting `chat` frame (with the store-assigned timestamp) to the
    /// whole room, sender included.
    ///
    /// Returns the stored message. A persistence failure aborts before any
    /// fan-out and is the caller's to surface to the sending session only.
    pub async fn execute(
        &self,
        session: &ChatSession,
        content: MessageContent,
    ) -> Result<ChatMessage, SendMessageError> {
        let stored = self
            .messages
            .create_message(&session.order, &session.principal, content)
            .await
            .map_err(SendMessageError::Persistence)?;

        let payload = serde_json::to_string(&OutboundEvent::from(&stored))?;
        let delivered = self
            .broker
            .broadcast(&session.room_key(), &payload)
            .await;

        tracing::debug!(
            room = %session.room_key(),
            sender = %stored.sender.id,
            delivered,
            "chat message broadcast"
        );

        Ok(stored)
    }
}
