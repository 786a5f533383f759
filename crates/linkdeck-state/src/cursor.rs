//! Keyboard selection over the visible list.

/// Nullable index into the current filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    index: Option<usize>,
}

impl ListCursor {
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Select row `index`; out of range clears the selection.
    pub fn select(&mut self, index: usize, len: usize) {
        self.index = (index < len).then_some(index);
    }

    /// Arrow down: starts at the first row, stops at the last.
    pub fn next(&mut self, len: usize) {
        self.index = match (self.index, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some((i + 1).min(len - 1)),
        };
    }

    /// Arrow up: starts at the last row, stops at the first.
    pub fn prev(&mut self, len: usize) {
        self.index = match (self.index, len) {
            (_, 0) => None,
            (None, len) => Some(len - 1),
            (Some(i), len) => Some(i.saturating_sub(1).min(len - 1)),
        };
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    /// Keep the selection inside a view that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.index = match (self.index, len) {
            (_, 0) | (None, _) => None,
            (Some(i), len) => Some(i.min(len - 1)),
        };
    }
}
