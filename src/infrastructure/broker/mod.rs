//! `RoomBroker` implementations.
//!
//! - `in_memory`: single-process fan-out over per-session mpsc sinks.
//! - A message-bus-backed implementation can be added here for multi-process
//!   deployments without touching the chat channel.

mod in_memory;

pub use in_memory::InMemoryRoomBroker;
