//! List controller: the cursor and the row editor owned together.
//!
//! Keyboard selection is suppressed while any row is editing or updating.

use linkdeck_core::{EditError, Link};

use crate::cursor::ListCursor;
use crate::edit::{RowEditor, RowView};

#[derive(Debug, Clone, Default)]
pub struct ListController {
    cursor: ListCursor,
    editor: RowEditor,
}

impl ListController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cursor(&self) -> ListCursor {
        self.cursor
    }

    #[must_use]
    pub fn editor(&self) -> &RowEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RowEditor {
        &mut self.editor
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editor.is_active()
    }

    pub fn move_down(&mut self, view_len: usize) {
        if !self.is_editing() {
            self.cursor.next(view_len);
        }
    }

    pub fn move_up(&mut self, view_len: usize) {
        if !self.is_editing() {
            self.cursor.prev(view_len);
        }
    }

    pub fn select(&mut self, index: usize, view_len: usize) {
        if !self.is_editing() {
            self.cursor.select(index, view_len);
        }
    }

    /// Click outside the list, Escape, or focusing the search input.
    pub fn clear_selection(&mut self) {
        self.cursor.clear();
    }

    /// Call after the view changed (new filter, deleted row).
    pub fn sync(&mut self, view_len: usize) {
        self.cursor.clamp(view_len);
    }

    /// The selected link; `None` while a row is editing.
    #[must_use]
    pub fn selected<'a>(&self, view: &'a [Link]) -> Option<&'a Link> {
        if self.is_editing() {
            return None;
        }
        self.cursor.index().and_then(|i| view.get(i))
    }

    /// Put `link` into edit mode.
    ///
    /// # Errors
    ///
    /// See [`RowEditor::begin`].
    pub fn begin_edit(&mut self, link: &Link) -> Result<(), EditError> {
        self.editor.begin(link)
    }

    /// Render data for every row of the view.
    #[must_use]
    pub fn rows<'a>(&'a self, view: &'a [Link]) -> Vec<RowView<'a>> {
        view.iter().map(|l| self.editor.row_view(l)).collect()
    }
}
