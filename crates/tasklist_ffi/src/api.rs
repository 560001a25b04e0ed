//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one sync function per task list interaction.
//! - Return plain envelopes; the shell renders them and owns prompts.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store access is serialized process-wide, so each call's
//!   load-mutate-persist cycle sees the previous call's write.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, SqliteSlotRepository, StoreResult, TaskId, TaskRecord, TaskStore,
};

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row as shown by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

impl From<&TaskRecord> for TaskItem {
    fn from(record: &TaskRecord) -> Self {
        Self {
            id: record.id,
            text: record.text.clone(),
            completed: record.completed,
        }
    }
}

/// Full list snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Rows in insertion order.
    pub items: Vec<TaskItem>,
    /// `"No tasks"` or `"<remaining> of <total> tasks left"`.
    pub summary: String,
    pub message: String,
}

/// Result of one mutating interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Whether the list changed.
    pub changed: bool,
    /// Id of the created task for `task_add`.
    pub task_id: Option<i64>,
    /// Summary after the interaction.
    pub summary: String,
    pub message: String,
}

impl TaskActionResponse {
    fn success(
        message: impl Into<String>,
        changed: bool,
        task_id: Option<TaskId>,
        summary: String,
    ) -> Self {
        Self {
            ok: true,
            changed,
            task_id,
            summary,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            summary: String::new(),
            message: message.into(),
        }
    }
}

/// Returns every task plus the summary line.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    let result = with_store(|store| {
        let items = store.tasks().iter().map(TaskItem::from).collect::<Vec<_>>();
        Ok((items, store.summary()))
    });
    match result {
        Ok((items, summary)) => TaskListResponse {
            ok: true,
            items,
            summary: summary.to_string(),
            message: String::new(),
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            summary: String::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Adds a task from the input field value.
///
/// Blank input is accepted and ignored (`changed = false`).
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskActionResponse {
    match with_store(|store| Ok((store.add(&text)?, store.summary()))) {
        Ok((Some(record), summary)) => TaskActionResponse::success(
            "Task added.",
            true,
            Some(record.id),
            summary.to_string(),
        ),
        Ok((None, summary)) => {
            TaskActionResponse::success("Empty task ignored.", false, None, summary.to_string())
        }
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Sets completion of one task; unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_completed(id: i64, completed: bool) -> TaskActionResponse {
    match with_store(|store| Ok((store.set_completed(id, completed)?, store.summary()))) {
        Ok((changed, summary)) => {
            let message = if changed { "Task updated." } else { "Task not found." };
            TaskActionResponse::success(message, changed, None, summary.to_string())
        }
        Err(err) => TaskActionResponse::failure(format!("task_set_completed failed: {err}")),
    }
}

/// Removes one task; unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(id: i64) -> TaskActionResponse {
    match with_store(|store| Ok((store.remove(id)?, store.summary()))) {
        Ok((changed, summary)) => {
            let message = if changed { "Task removed." } else { "Task not found." };
            TaskActionResponse::success(message, changed, None, summary.to_string())
        }
        Err(err) => TaskActionResponse::failure(format!("task_remove failed: {err}")),
    }
}

/// Clears the list after the shell collected the user's answer to
/// `tasklist_core::CLEAR_ALL_PROMPT`.
///
/// Nothing happens when the list is empty or `confirmed` is false.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_all(confirmed: bool) -> TaskActionResponse {
    let result = with_store(|store| {
        if store.is_empty() || !confirmed {
            return Ok((false, store.summary()));
        }
        store.clear_all()?;
        Ok((true, store.summary()))
    });
    match result {
        Ok((true, summary)) => {
            TaskActionResponse::success("All tasks deleted.", true, None, summary.to_string())
        }
        Ok((false, summary)) => {
            TaskActionResponse::success("Nothing cleared.", false, None, summary.to_string())
        }
        Err(err) => TaskActionResponse::failure(format!("tasks_clear_all failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteSlotRepository<'_>>) -> StoreResult<T>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_lock module=ffi status=recovered reason=poisoned");
        poisoned.into_inner()
    });

    let conn = open_db(resolve_db_path()).map_err(|err| format!("task DB open failed: {err}"))?;
    let mut store = TaskStore::load(SqliteSlotRepository::new(&conn))
        .map_err(|err| format!("task store load failed: {err}"))?;
    f(&mut store).map_err(|err| err.to_string())
}
