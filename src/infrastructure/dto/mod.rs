//! Data Transfer Objects for the chat service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: chat channel wire frames
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
