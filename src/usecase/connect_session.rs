//! UseCase: admitting a connection to an order's room.
//!
//! Admission has two steps with different failure modes: `authorize` runs
//! before the WebSocket upgrade and can reject the connection, `join` runs
//! after the upgrade succeeded and only then mutates the room registry. A
//! failed upgrade therefore never leaves a stale member behind.

use std::sync::Arc;

use crate::domain::{ChatSession, Order, OrderId, Principal, RoomBroker, SessionSink};

use super::{SessionAuthorizer, error::ConnectError};

pub struct ConnectSessionUseCase {
    authorizer: SessionAuthorizer,
    broker: Arc<dyn RoomBroker>,
}

impl ConnectSessionUseCase {
    pub fn new(authorizer: SessionAuthorizer, broker: Arc<dyn RoomBroker>) -> Self {
        Self { authorizer, broker }
    }

    /// Gate a connecting principal. No registry mutation happens here.
    pub async fn authorize(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<Order, ConnectError> {
        self.authorizer.authorize(principal, order_id).await
    }

    /// Register an authorized session's sink in its order's room.
    pub async fn join(&self, session: &ChatSession, sink: SessionSink) {
        self.broker.join(session.room_key(), session.id, sink).await;
        tracing::info!(
            session = %session.id,
            user = %session.principal.id,
            room = %session.room_key(),
            "session joined room"
        );
    }
}
