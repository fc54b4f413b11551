//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    domain::{OrderId, RoomKey},
    infrastructure::dto::http::RoomDetailDto,
};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Live session count for one order's room. Unknown or empty rooms report
/// zero sessions rather than 404, so this endpoint leaks nothing about which
/// orders exist.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> Json<RoomDetailDto> {
    let room = RoomKey::for_order(OrderId(order_id));
    let sessions = state.broker.session_count(&room).await;

    Json(RoomDetailDto {
        order_id,
        room: room.as_str().to_string(),
        sessions,
    })
}
