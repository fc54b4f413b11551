//! Application use cases composing the domain traits.

mod authorize_session;
mod connect_session;
mod disconnect_session;
mod error;
mod send_message;

pub use authorize_session::SessionAuthorizer;
pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, SendMessageError};
pub use send_message::SendMessageUseCase;
