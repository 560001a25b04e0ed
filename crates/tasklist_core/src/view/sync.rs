//! Store-to-surface synchronization.
//!
//! # Responsibility
//! - Mount rows for loaded and newly added tasks.
//! - Apply row/toggle/delete/clear interactions through the store first,
//!   then mirror the result onto the surface.
//!
//! # Invariants
//! - `rows` holds exactly one handle per task in the store after each
//!   `handle` call returns `Ok`.
//! - The summary is refreshed after every applied mutation.

use crate::model::id::{Clock, SystemClock};
use crate::model::task::{normalize_task_text, TaskId, TaskRecord};
use crate::repo::slot_repo::SlotRepository;
use crate::service::task_store::{StoreResult, TaskStore, TaskSummary};
use crate::view::surface::{ListSurface, ViewEvent, ViewOutcome};
use log::debug;
use std::collections::HashMap;

/// Prompt shown before clearing a non-empty list.
pub const CLEAR_ALL_PROMPT: &str = "Delete all tasks?";

/// Owns the store and its visual projection.
pub struct ViewSync<R: SlotRepository, V: ListSurface, C: Clock = SystemClock> {
    store: TaskStore<R, C>,
    surface: V,
    rows: HashMap<TaskId, V::Row>,
}

impl<R: SlotRepository, V: ListSurface, C: Clock> ViewSync<R, V, C> {
    /// Wraps a loaded store. Nothing is rendered until `mount_all`.
    pub fn new(store: TaskStore<R, C>, surface: V) -> Self {
        Self {
            store,
            surface,
            rows: HashMap::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<R, C> {
        &self.store
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    /// Number of mounted rows.
    pub fn mounted_len(&self) -> usize {
        self.rows.len()
    }

    /// Renders every stored task in list order, then the summary.
    pub fn mount_all(&mut self) {
        let records = self.store.tasks().to_vec();
        for record in &records {
            self.mount_one(record);
        }
        self.sync_summary();
    }

    /// Appends a row for `record` unless one is already mounted.
    pub fn mount_one(&mut self, record: &TaskRecord) {
        if self.rows.contains_key(&record.id) {
            return;
        }
        let row = self.surface.append_row(record);
        self.rows.insert(record.id, row);
    }

    /// Removes the row mounted for `id`; `false` when none was mounted.
    pub fn unmount(&mut self, id: TaskId) -> bool {
        match self.rows.remove(&id) {
            Some(row) => {
                self.surface.remove_row(row);
                true
            }
            None => false,
        }
    }

    pub fn refresh_summary(&mut self, summary: TaskSummary) {
        self.surface.set_summary(&summary.to_string());
    }

    /// Applies one user interaction.
    ///
    /// # Errors
    /// Store persistence errors are returned unchanged. The surface is left
    /// showing the store's state, which did not change.
    pub fn handle(&mut self, event: ViewEvent) -> StoreResult<ViewOutcome> {
        let outcome = match event {
            ViewEvent::Submit { input } => self.submit(&input)?,
            ViewEvent::CheckboxChanged { id, checked } => self.toggle(id, checked)?,
            ViewEvent::DeleteClicked { id } => self.delete(id)?,
            ViewEvent::ClearAllClicked => self.clear_all()?,
        };
        debug!("event=view_handle module=view outcome={outcome:?}");
        Ok(outcome)
    }

    fn submit(&mut self, input: &str) -> StoreResult<ViewOutcome> {
        let Some(text) = normalize_task_text(input) else {
            return Ok(ViewOutcome::Ignored);
        };
        let Some(record) = self.store.add(&text)? else {
            return Ok(ViewOutcome::Ignored);
        };

        self.mount_one(&record);
        self.surface.clear_input();
        self.surface.focus_input();
        self.sync_summary();
        Ok(ViewOutcome::Added(record.id))
    }

    fn toggle(&mut self, id: TaskId, checked: bool) -> StoreResult<ViewOutcome> {
        match self.store.set_completed(id, checked) {
            Ok(true) => {
                if let Some(row) = self.rows.get(&id) {
                    self.surface.set_row_completed(row, checked);
                }
                self.sync_summary();
                Ok(ViewOutcome::Toggled {
                    id,
                    completed: checked,
                })
            }
            Ok(false) => Ok(ViewOutcome::Ignored),
            Err(err) => {
                // The checkbox already flipped on the surface; put it back.
                let stored = self.store.get(id).map(|task| task.completed);
                if let (Some(row), Some(completed)) = (self.rows.get(&id), stored) {
                    self.surface.set_row_completed(row, completed);
                }
                Err(err)
            }
        }
    }

    fn delete(&mut self, id: TaskId) -> StoreResult<ViewOutcome> {
        if !self.store.remove(id)? {
            return Ok(ViewOutcome::Ignored);
        }
        self.unmount(id);
        self.sync_summary();
        Ok(ViewOutcome::Removed(id))
    }

    fn clear_all(&mut self) -> StoreResult<ViewOutcome> {
        if self.store.is_empty() {
            return Ok(ViewOutcome::Ignored);
        }
        if !self.surface.confirm(CLEAR_ALL_PROMPT) {
            return Ok(ViewOutcome::Ignored);
        }

        self.store.clear_all()?;
        for (_, row) in self.rows.drain() {
            self.surface.remove_row(row);
        }
        self.sync_summary();
        Ok(ViewOutcome::Cleared)
    }

    fn sync_summary(&mut self) {
        let summary = self.store.summary();
        self.refresh_summary(summary);
    }
}
