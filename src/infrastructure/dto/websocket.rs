//! WebSocket wire frames.

use serde::{Deserialize, Serialize};

/// Inbound chat payload. Only `content` is required; unknown fields are
/// ignored so clients can carry their own metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundChatMessage {
    pub content: String,
}

/// Outbound frames, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Acknowledges a successful join, sent once per session.
    Joined { order_id: u64, room: String },
    /// A persisted chat message fanned out to the room.
    Chat {
        content: String,
        /// Sender display name.
        sender: String,
        /// RFC 3339 UTC, assigned by the message store.
        timestamp: String,
    },
    /// Sender-only delivery failure notice.
    Error { message: String },
}
