//! WebSocket connection handlers: the per-connection chat channel.
//!
//! Lifecycle: authorize before the upgrade (a rejected principal never
//! reaches the room registry), join after the upgrade, then run a receive
//! loop and a pusher loop until either side ends, and leave the room on
//! every exit path.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{Sink, sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatSession, MessageContent, OrderId, Principal, UserId},
    infrastructure::dto::websocket::{InboundChatMessage, OutboundEvent},
    usecase::ConnectError,
};

use super::super::state::AppState;

/// Identity headers injected by the upstream gateway after authentication.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Upper bound on a single outbound push. A peer that stops reading but never
/// closes would otherwise leave `send` pending forever while its sink queue
/// grows with every room broadcast; on expiry the pusher ends and the
/// disconnect path reclaims the session.
const PUSH_TIMEOUT: Duration = Duration::from_secs(30);

fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let id = headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;
    let username = headers.get(USER_NAME_HEADER)?.to_str().ok()?;
    if username.is_empty() {
        return None;
    }
    Some(Principal::new(UserId(id), username))
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(principal) = principal_from_headers(&headers) else {
        tracing::warn!("connection without gateway identity headers rejected");
        return Err(StatusCode::UNAUTHORIZED);
    };
    let order_id = OrderId(order_id);

    match state.connect_session.authorize(&principal, order_id).await {
        Ok(order) => {
            let session = ChatSession::open(principal, order);
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session)))
        }
        Err(ConnectError::OrderNotFound) | Err(ConnectError::Forbidden) => {
            // One status for both cases so order ids cannot be enumerated.
            tracing::warn!(user = %principal.id, %order_id, "chat connection refused");
            Err(StatusCode::FORBIDDEN)
        }
        Err(ConnectError::Lookup(e)) => {
            tracing::error!(%order_id, "order lookup failed: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns the task that drains this session's sink and pushes each frame to
/// the WebSocket. A failed or timed-out push ends the task, which tears the
/// session down.
fn pusher_loop<S>(mut rx: mpsc::UnboundedReceiver<String>, mut sender: S) -> tokio::task::JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(PUSH_TIMEOUT, sender.send(Message::Text(msg.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => {
                    tracing::warn!("outbound push timed out, dropping unresponsive session");
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session: ChatSession) {
    let (mut sender, mut receiver) = socket.split();

    // The sink the broker uses for targeted delivery to this session.
    let (tx, rx) = mpsc::unbounded_channel();
    state.connect_session.join(&session, tx.clone()).await;

    // Ack the join before any broadcast can reach this session.
    let ack = match serde_json::to_string(&OutboundEvent::from(&session)) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(session = %session.id, "failed to encode join ack: {e}");
            state.disconnect_session.execute(&session).await;
            return;
        }
    };
    let pushed = tokio::time::timeout(PUSH_TIMEOUT, sender.send(Message::Text(ack.into()))).await;
    if !matches!(pushed, Ok(Ok(()))) {
        tracing::warn!(session = %session.id, "socket gone or unresponsive before join ack");
        state.disconnect_session.execute(&session).await;
        return;
    }

    let recv_session = session.clone();
    let recv_state = state.clone();
    let echo_tx = tx;

    // Inbound frames are processed one at a time, so one sender's messages
    // are persisted and broadcast in send order.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!(session = %recv_session.id, "WebSocket error: {e}");
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Malformed payloads are dropped and the connection stays
                    // open; see DESIGN.md.
                    let inbound = match serde_json::from_str::<InboundChatMessage>(&text) {
                        Ok(inbound) => inbound,
                        Err(e) => {
                            tracing::warn!(
                                session = %recv_session.id,
                                "dropping malformed payload: {e}"
                            );
                            continue;
                        }
                    };
                    let content = match MessageContent::new(inbound.content) {
                        Ok(content) => content,
                        Err(e) => {
                            tracing::warn!(
                                session = %recv_session.id,
                                "dropping invalid content: {e}"
                            );
                            continue;
                        }
                    };

                    if let Err(e) = recv_state
                        .send_message
                        .execute(&recv_session, content)
                        .await
                    {
                        tracing::warn!(session = %recv_session.id, "message not delivered: {e}");
                        // Surfaced to the sending session only.
                        let error_frame = OutboundEvent::Error {
                            message: "message could not be delivered".to_string(),
                        };
                        match serde_json::to_string(&error_frame) {
                            Ok(json) => {
                                let _ = echo_tx.send(json);
                            }
                            Err(e) => {
                                tracing::error!(
                                    session = %recv_session.id,
                                    "failed to encode error frame: {e}"
                                );
                            }
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!(session = %recv_session.id, "client requested close");
                    break;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled by the protocol layer.
                }
                Message::Binary(_) => {
                    // Same drop policy as malformed text: log and keep going.
                    tracing::warn!(session = %recv_session.id, "dropping binary frame");
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If either task completes, abort the other.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Best-effort cleanup on every exit path.
    state.disconnect_session.execute(&session).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        pin::Pin,
        task::{Context, Poll},
    };

    /// Transport whose peer stopped reading: every push pends forever.
    struct StalledSink;

    impl Sink<Message> for StalledSink {
        type Error = axum::Error;

        fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Pending
        }

        fn start_send(self: Pin<&mut Self>, _: Message) -> Result<(), Self::Error> {
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Pending
        }

        fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Pending
        }
    }

    #[derive(Clone, Default)]
    struct CollectSink(Arc<std::sync::Mutex<Vec<Message>>>);

    impl Sink<Message> for CollectSink {
        type Error = axum::Error;

        fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(self: Pin<&mut Self>, msg: Message) -> Result<(), Self::Error> {
            self.0.lock().unwrap().push(msg);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pusher_ends_when_the_transport_stops_responding() {
        // given: a queued frame and a peer that never drains its socket
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("frame".to_string()).unwrap();

        // when:
        let pusher = pusher_loop(rx, StalledSink);

        // then: the push deadline expires and the task finishes on its own,
        // so the session teardown in `handle_socket` can run
        tokio::time::timeout(PUSH_TIMEOUT * 2, pusher)
            .await
            .expect("pusher should stop once the push deadline expires")
            .unwrap();
    }

    #[tokio::test]
    async fn pusher_forwards_queued_frames_in_order() {
        // given:
        let sink = CollectSink::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let pusher = pusher_loop(rx, sink.clone());

        // when: two frames, then the sink closes
        tx.send("first".to_string()).unwrap();
        tx.send("second".to_string()).unwrap();
        drop(tx);
        pusher.await.unwrap();

        // then:
        let frames = sink.0.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[0], Message::Text(t) if t.as_str() == "first"));
        assert!(matches!(&frames[1], Message::Text(t) if t.as_str() == "second"));
    }
}
