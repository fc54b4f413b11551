//! Domain layer: entities, value objects and the traits the chat core needs
//! from the outside world (order/message persistence, room fan-out).

mod broker;
mod error;
mod model;
mod store;

pub use broker::{RoomBroker, SessionSink};
pub use error::{ContentError, StoreError};
pub use model::{
    ChatMessage, ChatSession, Gig, GigId, MessageContent, Order, OrderId, OrderStatus, Principal,
    RoomKey, SessionId, UserId,
};
#[cfg(test)]
pub use store::{MockMessageStore, MockOrderStore};
pub use store::{MessageStore, OrderStore};
