//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical task list and keep its durable mirror in sync.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_store;
