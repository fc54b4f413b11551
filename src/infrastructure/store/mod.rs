//! Store implementations.
//!
//! The in-memory stores back the test suite and the demo binary; a SQL-backed
//! deployment implements the same domain traits against the marketplace
//! database.

mod in_memory;

pub use in_memory::{InMemoryMessageStore, InMemoryOrderStore};
