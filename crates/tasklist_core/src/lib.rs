//! Core domain logic for the task list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::{next_task_id, Clock, SystemClock};
pub use model::task::{normalize_task_text, TaskId, TaskRecord, TaskValidationError};
pub use repo::slot_repo::{
    MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::task_store::{
    decode_tasks, DecodeError, StoreError, StoreResult, TaskStore, TaskSummary,
    TASKS_BACKUP_SLOT_KEY, TASKS_SLOT_KEY,
};
pub use view::surface::{ListSurface, ViewEvent, ViewOutcome};
pub use view::sync::{ViewSync, CLEAR_ALL_PROMPT};
pub use view::text_surface::{RowHandle, TextSurface};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
