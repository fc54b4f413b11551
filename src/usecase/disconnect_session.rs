//! UseCase: session teardown.

use std::sync::Arc;

use crate::domain::{ChatSession, RoomBroker};

pub struct DisconnectSessionUseCase {
    broker: Arc<dyn RoomBroker>,
}

impl DisconnectSessionUseCase {
    pub fn new(broker: Arc<dyn RoomBroker>) -> Self {
        Self { broker }
    }

    /// Remove the session from its room. Best-effort cleanup that runs on
    /// every disconnect path (client close, transport error, task abort) and
    /// never fails; leaving an unknown or already-empty room is a no-op.
    pub async fn execute(&self, session: &ChatSession) {
        self.broker.leave(&session.room_key(), &session.id).await;
        tracing::info!(
            session = %session.id,
            user = %session.principal.id,
            room = %session.room_key(),
            "session left room"
        );
    }
}
