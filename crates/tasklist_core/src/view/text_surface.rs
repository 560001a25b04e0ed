//! Plain-text list surface for terminals and tests.

use crate::model::task::TaskRecord;
use crate::view::surface::ListSurface;

/// Row handle issued by `TextSurface`.
#[derive(Debug, PartialEq, Eq)]
pub struct RowHandle(u64);

#[derive(Debug)]
struct TextRow {
    handle: u64,
    text: String,
    completed: bool,
}

/// In-memory surface that renders rows as numbered checkbox lines.
pub struct TextSurface {
    rows: Vec<TextRow>,
    next_handle: u64,
    summary: String,
    input: String,
    input_focused: bool,
    prompts: Vec<String>,
    confirm: Box<dyn FnMut(&str) -> bool>,
}

impl TextSurface {
    /// Creates a surface whose yes/no prompts are answered by `confirm`.
    pub fn new(confirm: impl FnMut(&str) -> bool + 'static) -> Self {
        Self {
            rows: Vec::new(),
            next_handle: 0,
            summary: String::new(),
            input: String::new(),
            input_focused: false,
            prompts: Vec::new(),
            confirm: Box::new(confirm),
        }
    }

    /// Row text and completed marker, top to bottom.
    pub fn rows(&self) -> Vec<(&str, bool)> {
        self.rows
            .iter()
            .map(|row| (row.text.as_str(), row.completed))
            .collect()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.input_focused = false;
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Every prompt shown so far, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Renders rows as `"<n>. [x] text"` lines followed by the summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, row) in self.rows.iter().enumerate() {
            let mark = if row.completed { 'x' } else { ' ' };
            out.push_str(&format!("{}. [{mark}] {}\n", index + 1, row.text));
        }
        out.push_str(&self.summary);
        out
    }

    fn row_mut(&mut self, handle: &RowHandle) -> Option<&mut TextRow> {
        self.rows.iter_mut().find(|row| row.handle == handle.0)
    }
}

impl ListSurface for TextSurface {
    type Row = RowHandle;

    fn append_row(&mut self, record: &TaskRecord) -> RowHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.rows.push(TextRow {
            handle,
            text: record.text.clone(),
            completed: record.completed,
        });
        RowHandle(handle)
    }

    fn set_row_completed(&mut self, row: &RowHandle, completed: bool) {
        if let Some(row) = self.row_mut(row) {
            row.completed = completed;
        }
    }

    fn remove_row(&mut self, row: RowHandle) {
        self.rows.retain(|existing| existing.handle != row.0);
    }

    fn set_summary(&mut self, text: &str) {
        self.summary = text.to_string();
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        (self.confirm)(message)
    }
}

#[cfg(test)]
mod tests {
    use super::TextSurface;
    use crate::model::task::TaskRecord;
    use crate::view::surface::ListSurface;

    #[test]
    fn render_numbers_rows_and_marks_completed() {
        let mut surface = TextSurface::new(|_| true);
        surface.append_row(&TaskRecord::new(1, "Buy milk").unwrap().with_completed(true));
        surface.append_row(&TaskRecord::new(2, "Walk dog").unwrap());
        surface.set_summary("1 of 2 tasks left");

        assert_eq!(
            surface.render(),
            "1. [x] Buy milk\n2. [ ] Walk dog\n1 of 2 tasks left"
        );
    }

    #[test]
    fn remove_row_only_drops_matching_handle() {
        let mut surface = TextSurface::new(|_| true);
        let first = surface.append_row(&TaskRecord::new(1, "a").unwrap());
        let _second = surface.append_row(&TaskRecord::new(2, "b").unwrap());

        surface.remove_row(first);
        assert_eq!(surface.rows(), vec![("b", false)]);
    }

    #[test]
    fn confirm_records_prompt_and_uses_callback_answer() {
        let mut surface = TextSurface::new(|_| false);
        assert!(!surface.confirm("Delete all tasks?"));
        assert_eq!(surface.prompts(), ["Delete all tasks?".to_string()]);
    }
}
