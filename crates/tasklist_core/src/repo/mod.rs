//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value slot contract used by the task store.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - A slot write replaces the whole value atomically.

pub mod slot_repo;
