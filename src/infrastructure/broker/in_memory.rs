//! In-memory room registry and fan-out for single-process deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RoomBroker, RoomKey, SessionId, SessionSink};

#[derive(Default)]
struct RoomMembers {
    sinks: HashMap<SessionId, SessionSink>,
}

/// Shared broker backed by a map of rooms, each with its own lock.
///
/// Lock order is always registry map -> room. The map lock is held only for
/// lookup, insert and remove; `broadcast` drops it before delivering, so
/// fan-out in one room never blocks joins, leaves or broadcasts in another.
pub struct InMemoryRoomBroker {
    rooms: Mutex<HashMap<RoomKey, Arc<Mutex<RoomMembers>>>>,
}

impl InMemoryRoomBroker {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomBroker for InMemoryRoomBroker {
    async fn join(&self, room: RoomKey, session: SessionId, sink: SessionSink) {
        let members = {
            let mut rooms = self.rooms.lock().await;
            rooms.entry(room).or_default().clone()
        };
        let mut members = members.lock().await;
        members.sinks.insert(session, sink);
    }

    async fn leave(&self, room: &RoomKey, session: &SessionId) {
        // The map lock is held across the member removal so that an
        // interleaved join cannot land in a room this call is about to
        // garbage-collect.
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get(room).cloned() else {
            return;
        };
        let emptied = {
            let mut members = members.lock().await;
            members.sinks.remove(session);
            members.sinks.is_empty()
        };
        if emptied {
            rooms.remove(room);
        }
    }

    async fn broadcast(&self, room: &RoomKey, payload: &str) -> usize {
        let members = {
            let rooms = self.rooms.lock().await;
            match rooms.get(room).cloned() {
                Some(members) => members,
                None => return 0,
            }
        };

        let mut members = members.lock().await;
        let mut delivered = 0;
        let mut gone: Vec<SessionId> = Vec::new();
        for (session, sink) in members.sinks.iter() {
            if sink.send(payload.to_string()).is_ok() {
                delivered += 1;
            } else {
                // Receiver dropped: the session is dead, prune it.
                tracing::warn!(%session, %room, "session sink gone, pruning from room");
                gone.push(*session);
            }
        }
        for session in gone {
            members.sinks.remove(&session);
        }
        delivered
    }

    async fn session_count(&self, room: &RoomKey) -> usize {
        let members = {
            let rooms = self.rooms.lock().await;
            match rooms.get(room).cloned() {
                Some(members) => members,
                None => return 0,
            }
        };
        let members = members.lock().await;
        members.sinks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderId;
    use tokio::sync::mpsc;

    fn room() -> RoomKey {
        RoomKey::for_order(OrderId(42))
    }

    #[tokio::test]
    async fn join_is_idempotent_for_the_same_session() {
        // given:
        let broker = InMemoryRoomBroker::new();
        let session = SessionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when: the same session handle joins twice
        broker.join(room(), session, tx.clone()).await;
        broker.join(room(), session, tx).await;

        // then:
        assert_eq!(broker.session_count(&room()).await, 1);
    }

    #[tokio::test]
    async fn leave_on_unknown_room_is_a_no_op() {
        let broker = InMemoryRoomBroker::new();
        broker.leave(&room(), &SessionId::generate()).await;
        assert_eq!(broker.session_count(&room()).await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_member_exactly_once() {
        // given: three members in the room
        let broker = InMemoryRoomBroker::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        broker.join(room(), SessionId::generate(), tx1).await;
        broker.join(room(), SessionId::generate(), tx2).await;
        broker.join(room(), SessionId::generate(), tx3).await;

        // when:
        let delivered = broker.broadcast(&room(), "event").await;

        // then:
        assert_eq!(delivered, 3);
        for rx in [&mut rx1, &mut rx2, &mut rx3] {
            assert_eq!(rx.try_recv().unwrap(), "event");
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn no_delivery_after_leave_completes() {
        // given:
        let broker = InMemoryRoomBroker::new();
        let session = SessionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (other_tx, _other_rx) = mpsc::unbounded_channel();
        broker.join(room(), session, tx).await;
        broker.join(room(), SessionId::generate(), other_tx).await;

        // when:
        broker.leave(&room(), &session).await;
        let delivered = broker.broadcast(&room(), "event").await;

        // then: the departed session observes nothing
        assert_eq!(delivered, 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dead_sink_is_pruned_and_other_deliveries_proceed() {
        // given: one member whose receiver is already gone
        let broker = InMemoryRoomBroker::new();
        let dead = SessionId::generate();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        drop(dead_rx);
        let (live_tx, mut live_rx) = mpsc::unbounded_channel();
        broker.join(room(), dead, dead_tx).await;
        broker.join(room(), SessionId::generate(), live_tx).await;

        // when:
        let delivered = broker.broadcast(&room(), "event").await;

        // then: the live member got the event, the dead one was removed
        assert_eq!(delivered, 1);
        assert_eq!(live_rx.try_recv().unwrap(), "event");
        assert_eq!(broker.session_count(&room()).await, 1);
    }

    #[tokio::test]
    async fn empty_room_is_garbage_collected_and_recreated_on_join() {
        // given:
        let broker = InMemoryRoomBroker::new();
        let session = SessionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        broker.join(room(), session, tx).await;

        // when: the last member leaves
        broker.leave(&room(), &session).await;

        // then: the room is gone from the registry
        assert_eq!(broker.rooms.lock().await.len(), 0);

        // and: a later join recreates it implicitly
        let (tx2, _rx2) = mpsc::unbounded_channel();
        broker.join(room(), SessionId::generate(), tx2).await;
        assert_eq!(broker.session_count(&room()).await, 1);
    }

    #[tokio::test]
    async fn rooms_are_independent() {
        // given: members in two different order rooms
        let broker = InMemoryRoomBroker::new();
        let other_room = RoomKey::for_order(OrderId(43));
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        broker.join(room(), SessionId::generate(), tx1).await;
        broker.join(other_room.clone(), SessionId::generate(), tx2).await;

        // when:
        broker.broadcast(&room(), "for 42").await;

        // then: only order 42's member hears it
        assert_eq!(rx1.try_recv().unwrap(), "for 42");
        assert!(rx2.try_recv().is_err());
        assert_eq!(broker.session_count(&other_room).await, 1);
    }

    #[tokio::test]
    async fn broadcast_to_unknown_room_delivers_nothing() {
        let broker = InMemoryRoomBroker::new();
        assert_eq!(broker.broadcast(&room(), "event").await, 0);
    }

    #[tokio::test]
    async fn concurrent_joins_and_broadcasts_do_not_lose_members() {
        // given:
        let broker = Arc::new(InMemoryRoomBroker::new());

        // when: many sessions join while broadcasts are in flight
        let mut handles = Vec::new();
        for _ in 0..32 {
            let broker = broker.clone();
            handles.push(tokio::spawn(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                broker.join(room(), SessionId::generate(), tx).await;
                broker.broadcast(&room(), "ping").await;
                rx
            }));
        }
        let mut receivers = Vec::new();
        for handle in handles {
            receivers.push(handle.await.unwrap());
        }

        // then: every join is visible and a final broadcast reaches all
        assert_eq!(broker.session_count(&room()).await, 32);
        assert_eq!(broker.broadcast(&room(), "final").await, 32);
        for mut rx in receivers {
            let mut saw_final = false;
            while let Ok(frame) = rx.try_recv() {
                if frame == "final" {
                    saw_final = true;
                }
            }
            assert!(saw_final);
        }
    }
}
