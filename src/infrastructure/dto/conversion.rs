//! Conversion logic between domain entities and wire DTOs.

use crate::domain::{ChatMessage, ChatSession};
use crate::infrastructure::dto::websocket::OutboundEvent;

impl From<&ChatMessage> for OutboundEvent {
    fn from(message: &ChatMessage) -> Self {
        OutboundEvent::Chat {
            content: message.content.as_str().to_string(),
            sender: message.sender.username.clone(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

impl From<&ChatSession> for OutboundEvent {
    fn from(session: &ChatSession) -> Self {
        OutboundEvent::Joined {
            order_id: session.order.id.0,
            room: session.room_key().as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Gig, GigId, MessageContent, Order, OrderId, OrderStatus, Principal, UserId,
    };
    use chrono::{TimeZone, Utc};

    fn order_42() -> Order {
        Order {
            id: OrderId(42),
            buyer_id: UserId(1),
            gig: Gig {
                id: GigId(7),
                seller_id: UserId(2),
            },
            status: OrderStatus::InProgress,
        }
    }

    #[test]
    fn chat_message_converts_to_chat_frame() {
        // given:
        let message = ChatMessage {
            order_id: OrderId(42),
            sender: Principal::new(UserId(1), "B"),
            content: MessageContent::new("hi").unwrap(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap(),
        };

        // when:
        let event = OutboundEvent::from(&message);

        // then:
        assert_eq!(
            event,
            OutboundEvent::Chat {
                content: "hi".to_string(),
                sender: "B".to_string(),
                timestamp: "2026-08-23T12:00:00+00:00".to_string(),
            }
        );
    }

    #[test]
    fn session_converts_to_joined_frame() {
        // given:
        let session = ChatSession::open(Principal::new(UserId(1), "B"), order_42());

        // when:
        let event = OutboundEvent::from(&session);

        // then:
        assert_eq!(
            event,
            OutboundEvent::Joined {
                order_id: 42,
                room: "order:42".to_string(),
            }
        );
    }
}
