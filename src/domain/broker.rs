//! Room registry and broadcast fan-out seam.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{RoomKey, SessionId};

/// Outbound channel for one session. The WebSocket side of the connection
/// drains this queue; the broker only ever pushes serialized frames into it.
pub type SessionSink = mpsc::UnboundedSender<String>;

/// Maps room keys to the set of live session sinks and delivers events to
/// all of them.
///
/// The in-memory implementation covers single-process deployments; a
/// message-bus-backed implementation can replace it behind this trait for
/// multi-process fan-out.
#[async_trait]
pub trait RoomBroker: Send + Sync {
    /// Register a session sink in a room. Idempotent for the same session id.
    /// The room is created implicitly on first join.
    async fn join(&self, room: RoomKey, session: SessionId, sink: SessionSink);

    /// Remove a session from a room. Calling this on an unknown room or an
    /// already-removed session is not an error. Once `leave` returns, the
    /// session observes no subsequent broadcast to that room.
    async fn leave(&self, room: &RoomKey, session: &SessionId);

    /// Deliver `payload` to every session currently in the room, at most once
    /// per session. Sessions whose sink is gone are treated as disconnected
    /// and pruned. Returns the number of successful deliveries.
    async fn broadcast(&self, room: &RoomKey, payload: &str) -> usize;

    /// Number of live sessions in a room (0 for unknown rooms).
    async fn session_count(&self, room: &RoomKey) -> usize;
}
