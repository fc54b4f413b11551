//! Entities and value objects for the order-chat core.
//!
//! `Order` and `Gig` are read-only projections of marketplace entities owned
//! by the external store; `ChatSession` and `RoomKey` are runtime-only and
//! never persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ContentError;

/// Maximum chat message length in characters.
pub const MAX_CONTENT_LENGTH: usize = 2_000;

/// Marketplace user identifier, assigned by the external user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Order identifier, assigned by the external order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Gig (service listing) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct GigId(pub u64);

/// Unique handle for one live WebSocket session, used for targeted delivery
/// and room membership. Generated at connect time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authenticated identity attached to a connection by the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    /// Display name used as `sender` on outbound chat frames.
    pub username: String,
}

impl Principal {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// A service listing. Only the fields the chat core reads are projected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gig {
    pub id: GigId,
    pub seller_id: UserId,
}

/// Order lifecycle status. The chat channel stays open in every status; the
/// status is carried for introspection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    #[default]
    InProgress,
    Delivered,
    Completed,
    Cancelled,
}

/// A transaction linking a buyer to a gig. Exactly one buyer and one seller
/// (the gig's) are authorized per order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub gig: Gig,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// The single authorization rule for order chat: the order's buyer or the
    /// gig's seller. There is no `Order::seller` field on purpose.
    pub fn is_participant(&self, user: UserId) -> bool {
        user == self.buyer_id || user == self.gig.seller_id
    }
}

/// Validated chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(content: impl Into<String>) -> Result<Self, ContentError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ContentError::Empty);
        }
        let length = content.chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(ContentError::TooLong(length));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Room identifier derived deterministically from the order id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn for_order(order_id: OrderId) -> Self {
        Self(format!("order:{order_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted chat message. Constructed by the message store, which assigns
/// the timestamp; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub order_id: OrderId,
    pub sender: Principal,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

/// One live, authorized connection to an order's room.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: SessionId,
    pub principal: Principal,
    pub order: Order,
}

impl ChatSession {
    /// Create a session for an already-authorized principal/order pair.
    pub fn open(principal: Principal, order: Order) -> Self {
        Self {
            id: SessionId::generate(),
            principal,
            order,
        }
    }

    pub fn room_key(&self) -> RoomKey {
        RoomKey::for_order(self.order.id)
    }
}
