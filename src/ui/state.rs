//! Shared application state.

use std::sync::Arc;

use crate::domain::{MessageStore, OrderStore, RoomBroker};
use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, SendMessageUseCase, SessionAuthorizer,
};

/// Use cases shared by every connection, plus the broker for introspection
/// endpoints.
pub struct AppState {
    pub connect_session: Arc<ConnectSessionUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub disconnect_session: Arc<DisconnectSessionUseCase>,
    pub broker: Arc<dyn RoomBroker>,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        messages: Arc<dyn MessageStore>,
        broker: Arc<dyn RoomBroker>,
    ) -> Self {
        Self {
            connect_session: Arc::new(ConnectSessionUseCase::new(
                SessionAuthorizer::new(orders),
                broker.clone(),
            )),
            send_message: Arc::new(SendMessageUseCase::new(messages, broker.clone())),
            disconnect_session: Arc::new(DisconnectSessionUseCase::new(broker.clone())),
            broker,
        }
    }
}
