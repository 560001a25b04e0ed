//! Key-value slot repository contracts and implementations.
//!
//! # Responsibility
//! - Read and replace named string slots in durable storage.
//! - Provide an in-process double for store tests.
//!
//! # Invariants
//! - `write_slot` either stores the full value or leaves the old one.
//! - `read_slot` returns `None` only when the slot was never written.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for slot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backend refused the operation (quota, read-only medium, ...).
    Storage(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Storage(message) => write!(f, "slot storage failed: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Storage(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named durable slots.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: SlotRepository + ?Sized> SlotRepository for &T {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_slot(key, value)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process slot repository.
///
/// Single-threaded by construction (`RefCell`), matching how the store is
/// driven from one event-handling context.
#[derive(Debug, Default)]
pub struct MemorySlotRepository {
    slots: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository with one slot already populated.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let repo = Self::default();
        repo.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        repo
    }

    /// Makes every subsequent read fail with `RepoError::Storage`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes every subsequent write fail with `RepoError::Storage`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Returns a snapshot of one slot value.
    pub fn slot(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(RepoError::Storage("storage unavailable".to_string()));
        }
        Ok(self.slot(key))
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Storage("quota exceeded".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotRepository, RepoError, SlotRepository};

    #[test]
    fn memory_repo_replaces_values() {
        let repo = MemorySlotRepository::new();
        assert_eq!(repo.read_slot("k").unwrap(), None);

        repo.write_slot("k", "one").unwrap();
        repo.write_slot("k", "two").unwrap();
        assert_eq!(repo.read_slot("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn memory_repo_failing_writes_keep_old_value() {
        let repo = MemorySlotRepository::with_slot("k", "kept");
        repo.set_fail_writes(true);

        let err = repo.write_slot("k", "lost").unwrap_err();
        assert!(matches!(err, RepoError::Storage(_)));
        assert_eq!(repo.slot("k").as_deref(), Some("kept"));
    }

    #[test]
    fn memory_repo_failing_reads_report_storage_error() {
        let repo = MemorySlotRepository::with_slot("k", "v");
        repo.set_fail_reads(true);

        assert!(matches!(repo.read_slot("k"), Err(RepoError::Storage(_))));
    }
}
