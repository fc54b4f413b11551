//! Real-time order chat service for a freelance marketplace.
//!
//! Buyers and sellers of an order exchange messages over a WebSocket channel
//! scoped to that order. This crate covers the connection lifecycle, session
//! authorization, room registry and broadcast fan-out; the relational stores
//! for orders and messages are external collaborators behind traits.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
