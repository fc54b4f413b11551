//! Infrastructure layer: concrete implementations of the domain traits plus
//! the wire-format DTOs.

pub mod broker;
pub mod dto;
pub mod store;
