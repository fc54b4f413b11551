//! HTTP API response DTOs.

use serde::Serialize;

/// Live state of one order's room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailDto {
    pub order_id: u64,
    pub room: String,
    /// Number of currently connected sessions.
    pub sessions: usize,
}
