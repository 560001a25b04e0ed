//! Visual surface contract driven by `ViewSync`.

use crate::model::task::{TaskId, TaskRecord};

/// Visual list tree plus the input and prompt controls around it.
///
/// Implementations render; they never decide what the list contains.
pub trait ListSurface {
    /// Handle to one rendered row. Ownership moves back on removal.
    type Row;

    /// Appends a row at the end, with checkbox and completed marker set
    /// from `record.completed`.
    fn append_row(&mut self, record: &TaskRecord) -> Self::Row;

    /// Sets checkbox state and completed marker of one row together.
    fn set_row_completed(&mut self, row: &Self::Row, completed: bool);

    fn remove_row(&mut self, row: Self::Row);

    fn set_summary(&mut self, text: &str);

    fn clear_input(&mut self);

    fn focus_input(&mut self);

    /// Asks a yes/no question; `true` means confirmed.
    fn confirm(&mut self, message: &str) -> bool;
}

/// User interaction delivered to `ViewSync::handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Form submitted with the raw input field value.
    Submit { input: String },
    /// Row checkbox changed to `checked`.
    CheckboxChanged { id: TaskId, checked: bool },
    /// Row delete control clicked.
    DeleteClicked { id: TaskId },
    /// Global clear-all control clicked.
    ClearAllClicked,
}

/// What an interaction ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Removed(TaskId),
    Cleared,
    /// Empty submit, unknown id, empty list, or declined confirmation.
    Ignored,
}
