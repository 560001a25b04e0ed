//! Task store: canonical list plus durable mirror.
//!
//! # Responsibility
//! - Load the persisted task list at startup.
//! - Apply add/toggle/remove/clear mutations and persist the full list.
//! - Derive the remaining/total summary.
//!
//! # Invariants
//! - After every mutation returns, memory equals the persisted slot.
//! - A failed write leaves memory at the last persisted state.
//! - List order is insertion order.
//! - Ids are unique within the list.

use crate::model::id::{next_task_id, Clock, SystemClock};
use crate::model::task::{normalize_task_text, TaskId, TaskRecord};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the serialized task list.
pub const TASKS_SLOT_KEY: &str = "todo-tasks";
/// Slot receiving an unreadable payload found at load time.
pub const TASKS_BACKUP_SLOT_KEY: &str = "todo-tasks.corrupt";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
#[derive(Debug)]
pub enum StoreError {
    /// Durable slot read or write failed.
    Repo(RepoError),
    /// In-memory list could not be serialized.
    Encode(serde_json::Error),
    /// The list already holds the largest representable id.
    IdExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
            Self::IdExhausted => write!(f, "no task id left above {}", TaskId::MAX),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::IdExhausted => None,
        }
    }
}

/// Reasons a persisted task list payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, not an array, or a record failed validation.
    InvalidPayload { line: usize, column: usize },
    /// Two records share one id.
    DuplicateId(TaskId),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPayload { line, column } => {
                write!(f, "invalid_payload line={line} column={column}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate_id id={id}"),
        }
    }
}

impl Error for DecodeError {}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Derived remaining/total counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
    pub remaining: usize,
    pub total: usize,
}

impl Display for TaskSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.total == 0 {
            write!(f, "No tasks")
        } else {
            write!(f, "{} of {} tasks left", self.remaining, self.total)
        }
    }
}

/// Owner of the canonical task list.
pub struct TaskStore<R: SlotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    tasks: Vec<TaskRecord>,
}

impl<R: SlotRepository> TaskStore<R, SystemClock> {
    /// Loads the persisted list using wall-clock id allocation.
    pub fn load(repo: R) -> StoreResult<Self> {
        Self::load_with_clock(repo, SystemClock)
    }
}

impl<R: SlotRepository, C: Clock> TaskStore<R, C> {
    /// Loads the persisted list.
    ///
    /// # Contract
    /// - Missing or empty slot: empty list, nothing written.
    /// - Malformed slot: raw payload copied to `TASKS_BACKUP_SLOT_KEY`,
    ///   empty list. The primary slot is left as-is until the next mutation.
    ///
    /// # Errors
    /// - `StoreError::Repo` when the slot cannot be read or the backup
    ///   cannot be written.
    pub fn load_with_clock(repo: R, clock: C) -> StoreResult<Self> {
        let tasks = match repo.read_slot(TASKS_SLOT_KEY)? {
            None => Vec::new(),
            Some(raw) if raw.is_empty() => Vec::new(),
            Some(raw) => match decode_tasks(&raw) {
                Ok(tasks) => tasks,
                Err(reason) => {
                    warn!(
                        "event=tasks_load module=store status=recovered reason={} payload_bytes={}",
                        reason,
                        raw.len()
                    );
                    repo.write_slot(TASKS_BACKUP_SLOT_KEY, &raw)?;
                    Vec::new()
                }
            },
        };

        info!(
            "event=tasks_load module=store status=ok total={}",
            tasks.len()
        );
        Ok(Self { repo, clock, tasks })
    }

    /// Current list in insertion order.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a new open task.
    ///
    /// Returns `Ok(None)` without writing when `text` trims to empty.
    ///
    /// # Errors
    /// - `StoreError::IdExhausted` when no larger id exists; nothing is written.
    /// - `StoreError::Repo` when the write fails.
    pub fn add(&mut self, text: &str) -> StoreResult<Option<TaskRecord>> {
        let Some(text) = normalize_task_text(text) else {
            return Ok(None);
        };

        let id = next_task_id(
            self.clock.now_epoch_ms(),
            self.tasks.iter().map(|task| task.id),
        )
        .ok_or(StoreError::IdExhausted)?;
        let record = TaskRecord {
            id,
            text,
            completed: false,
        };

        let mut next = self.tasks.clone();
        next.push(record.clone());
        self.commit(next)?;

        info!(
            "event=task_add module=store status=ok id={} total={}",
            id,
            self.tasks.len()
        );
        Ok(Some(record))
    }

    /// Sets the completion flag of one task.
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown.
    pub fn set_completed(&mut self, id: TaskId, value: bool) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next[index] = next[index].with_completed(value);
        self.commit(next)?;

        info!("event=task_set_completed module=store status=ok id={id} completed={value}");
        Ok(true)
    }

    /// Removes one task.
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next)?;

        info!(
            "event=task_remove module=store status=ok id={} total={}",
            id,
            self.tasks.len()
        );
        Ok(true)
    }

    /// Removes every task. Confirmation is the caller's job.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        let removed = self.tasks.len();
        self.commit(Vec::new())?;
        info!("event=tasks_clear module=store status=ok removed={removed}");
        Ok(())
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            remaining: self.tasks.iter().filter(|task| !task.completed).count(),
            total: self.tasks.len(),
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn commit(&mut self, next: Vec<TaskRecord>) -> StoreResult<()> {
        let encoded = serde_json::to_string(&next).map_err(StoreError::Encode)?;
        if let Err(err) = self.repo.write_slot(TASKS_SLOT_KEY, &encoded) {
            warn!("event=tasks_persist module=store status=error error={err}");
            return Err(err.into());
        }
        self.tasks = next;
        Ok(())
    }
}

/// Parses a persisted payload, rejecting invalid records and duplicate ids.
pub fn decode_tasks(raw: &str) -> Result<Vec<TaskRecord>, DecodeError> {
    let tasks: Vec<TaskRecord> =
        serde_json::from_str(raw).map_err(|err| DecodeError::InvalidPayload {
            line: err.line(),
            column: err.column(),
        })?;

    let mut seen = HashSet::with_capacity(tasks.len());
    if let Some(duplicate) = tasks.iter().find(|task| !seen.insert(task.id)) {
        return Err(DecodeError::DuplicateId(duplicate.id));
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, DecodeError, TaskSummary};

    #[test]
    fn summary_renders_empty_and_counts() {
        let empty = TaskSummary {
            remaining: 0,
            total: 0,
        };
        assert_eq!(empty.to_string(), "No tasks");

        let partial = TaskSummary {
            remaining: 2,
            total: 3,
        };
        assert_eq!(partial.to_string(), "2 of 3 tasks left");
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[{"id":1,"text":"a","completed":false},{"id":1,"text":"b","completed":true}]"#;
        let err = decode_tasks(raw).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateId(1));
        assert_eq!(err.to_string(), "duplicate_id id=1");
    }

    #[test]
    fn decode_rejects_missing_text_and_foreign_shapes() {
        assert!(decode_tasks(r#"[{"id":1,"completed":false}]"#).is_err());
        assert!(decode_tasks(r#"[{"id":1,"text":"  ","completed":false}]"#).is_err());
        assert!(decode_tasks(r#"{"tasks":[]}"#).is_err());
        assert!(matches!(
            decode_tasks("not json").unwrap_err(),
            DecodeError::InvalidPayload { line: 1, .. }
        ));
    }

    #[test]
    fn decode_keeps_persisted_order() {
        let raw = r#"[{"id":9,"text":"b","completed":true},{"id":2,"text":"a","completed":false}]"#;
        let ids = decode_tasks(raw)
            .unwrap()
            .into_iter()
            .map(|task| task.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![9, 2]);
    }
}
