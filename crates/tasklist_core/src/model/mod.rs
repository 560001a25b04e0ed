//! Task list domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, view and FFI layers.
//! - Own id allocation rules for newly created tasks.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique within its list.
//! - Task text is never empty or whitespace-only.

pub mod id;
pub mod task;
