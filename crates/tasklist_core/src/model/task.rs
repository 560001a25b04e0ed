//! Task record model.
//!
//! # Responsibility
//! - Define the single persisted entity of the task list.
//! - Validate records at construction and deserialization boundaries.
//!
//! # Invariants
//! - `id` and `text` are immutable after creation.
//! - `text` is trimmed and non-empty.
//! - Wire shape is exactly `{ "id": int, "text": string, "completed": bool }`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Correlation key between a task record and its visible row.
///
/// Derived from creation time in epoch milliseconds, see `model::id`.
pub type TaskId = i64;

/// Validation errors for task record invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecordWire")]
pub struct TaskRecord {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

#[derive(Deserialize)]
struct TaskRecordWire {
    id: TaskId,
    text: String,
    completed: bool,
}

impl TryFrom<TaskRecordWire> for TaskRecord {
    type Error = TaskValidationError;

    fn try_from(value: TaskRecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            id: value.id,
            text: value.text,
            completed: value.completed,
        };
        record.validate()?;
        Ok(record)
    }
}

impl TaskRecord {
    /// Creates an open task with trimmed text.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is empty or whitespace-only.
    pub fn new(id: TaskId, text: &str) -> Result<Self, TaskValidationError> {
        let text = normalize_task_text(text).ok_or(TaskValidationError::EmptyText)?;
        Ok(Self {
            id,
            text,
            completed: false,
        })
    }

    /// Checks record invariants.
    ///
    /// Persisted text is expected to already be trimmed, so only emptiness
    /// is enforced here.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Returns a copy with `completed` replaced.
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }
}

/// Trims user input; `None` when nothing remains.
pub fn normalize_task_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
