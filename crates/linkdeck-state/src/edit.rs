//! Inline row editing.
//!
//! A single [`RowEditor`] is owned by the list, so at most one row can be
//! editing or updating at a time:
//!
//! ```text
//! Viewing --begin--> Editing --commit(changed)--> Updating --finish--> Viewing
//!                       |
//!                       +--commit(unchanged | empty field)--> Viewing
//! ```
//!
//! The draft only exists while its row is active. Every other row renders
//! committed values, so external changes show up without any reconciling.

use linkdeck_core::tags::parse_tag_list;
use linkdeck_core::{EditError, Link, LinkError, LinkPatch};

/// Uncommitted title/url/tags of the row being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
}

impl Draft {
    #[must_use]
    pub fn from_link(link: &Link) -> Self {
        Self {
            title: link.title.clone(),
            url: link.url.clone(),
            tags: link.tags.clone(),
        }
    }

    /// Replace the tags from comma separated input.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::ReservedTag`] for selector pseudo tags.
    pub fn set_tags_from_input(&mut self, input: &str) -> Result<(), LinkError> {
        self.tags = parse_tag_list(input)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing,
    Updating,
}

/// What committing the draft requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitDecision {
    /// Title or url was empty after trimming; the draft was discarded.
    Rejected,
    /// Nothing differs from the committed record.
    Unchanged,
    /// Send this update; the row stays `Updating` until [`RowEditor::finish_update`].
    Submit(LinkPatch),
}

/// Result of committing an edit through the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Rejected,
    Unchanged,
    Updated(Link),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowEditor {
    #[default]
    Viewing,
    Editing {
        id: String,
        draft: Draft,
    },
    Updating {
        id: String,
        draft: Draft,
    },
}

impl RowEditor {
    /// Id of the row being edited or updated.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        match self {
            RowEditor::Viewing => None,
            RowEditor::Editing { id, .. } | RowEditor::Updating { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, RowEditor::Viewing)
    }

    #[must_use]
    pub fn mode_of(&self, row_id: &str) -> RowMode {
        match self {
            RowEditor::Editing { id, .. } if id == row_id => RowMode::Editing,
            RowEditor::Updating { id, .. } if id == row_id => RowMode::Updating,
            _ => RowMode::Viewing,
        }
    }

    /// Start editing `link`, seeding the draft from its committed values.
    ///
    /// Beginning again on the row already being edited keeps its draft.
    ///
    /// # Errors
    ///
    /// [`EditError::InProgress`] if another row is editing,
    /// [`EditError::Updating`] if a row is waiting for its update.
    pub fn begin(&mut self, link: &Link) -> Result<(), EditError> {
        match self {
            RowEditor::Viewing => {
                *self = RowEditor::Editing {
                    id: link.id.clone(),
                    draft: Draft::from_link(link),
                };
                Ok(())
            }
            RowEditor::Editing { id, .. } if *id == link.id => Ok(()),
            RowEditor::Editing { id, .. } => Err(EditError::InProgress { id: id.clone() }),
            RowEditor::Updating { id, .. } => Err(EditError::Updating { id: id.clone() }),
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            RowEditor::Viewing => None,
            RowEditor::Editing { draft, .. } | RowEditor::Updating { draft, .. } => Some(draft),
        }
    }

    /// Mutable draft; inputs are disabled while the update is in flight.
    ///
    /// # Errors
    ///
    /// [`EditError::NotEditing`] or [`EditError::Updating`].
    pub fn draft_mut(&mut self) -> Result<&mut Draft, EditError> {
        match self {
            RowEditor::Editing { draft, .. } => Ok(draft),
            RowEditor::Updating { id, .. } => Err(EditError::Updating { id: id.clone() }),
            RowEditor::Viewing => Err(EditError::NotEditing),
        }
    }

    /// Commit the draft against the committed record of the edited row.
    ///
    /// # Errors
    ///
    /// [`EditError::NotEditing`] when no row (or a different row) is editing,
    /// [`EditError::Updating`] while an update is in flight.
    pub fn commit(&mut self, committed: &Link) -> Result<CommitDecision, EditError> {
        let (id, draft) = match std::mem::take(self) {
            RowEditor::Editing { id, draft } if id == committed.id => (id, draft),
            other @ RowEditor::Updating { .. } => {
                let id = other.active_id().unwrap_or_default().to_string();
                *self = other;
                return Err(EditError::Updating { id });
            }
            other => {
                *self = other;
                return Err(EditError::NotEditing);
            }
        };

        let title = draft.title.trim();
        let url = draft.url.trim();
        if title.is_empty() || url.is_empty() {
            return Ok(CommitDecision::Rejected);
        }

        if title == committed.title && url == committed.url && draft.tags == committed.tags {
            return Ok(CommitDecision::Unchanged);
        }

        let patch = LinkPatch::new(id.clone())
            .with_url(url)
            .with_title(title)
            .with_tags(draft.tags.clone());
        *self = RowEditor::Updating { id, draft };
        Ok(CommitDecision::Submit(patch))
    }

    /// The submitted update resolved, successfully or not.
    pub fn finish_update(&mut self) {
        if matches!(self, RowEditor::Updating { .. }) {
            *self = RowEditor::Viewing;
        }
    }

    /// Drop the draft of the row being edited.
    pub fn cancel(&mut self) {
        if matches!(self, RowEditor::Editing { .. }) {
            *self = RowEditor::Viewing;
        }
    }

    /// What a row shows: the draft while it is active, committed values otherwise.
    #[must_use]
    pub fn row_view<'a>(&'a self, link: &'a Link) -> RowView<'a> {
        let mode = self.mode_of(&link.id);
        let draft = self.draft().filter(|_| mode != RowMode::Viewing);
        RowView {
            id: &link.id,
            title: draft.map_or(link.title.as_str(), |d| d.title.as_str()),
            url: draft.map_or(link.url.as_str(), |d| d.url.as_str()),
            tags: draft.map_or(link.tags.as_slice(), |d| d.tags.as_slice()),
            pinned: link.is_pinned(),
            mode,
            dimmed: self.is_active() && mode == RowMode::Viewing,
        }
    }
}

/// Render data for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    pub tags: &'a [String],
    pub pinned: bool,
    pub mode: RowMode,
    /// Another row is being edited; this one is non-interactive.
    pub dimmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn link(id: &str, title: &str, url: &str, tags: &[&str]) -> Link {
        Link {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            visited_at: None,
        }
    }

    #[test]
    fn begin_seeds_draft_from_committed_record() {
        let l = link("1", "A", "a.com", &["work"]);
        let mut editor = RowEditor::default();
        editor.begin(&l).unwrap();
        assert_eq!(editor.mode_of("1"), RowMode::Editing);
        assert_eq!(editor.draft(), Some(&Draft::from_link(&l)));
    }

    #[test]
    fn only_one_row_edits_at_a_time() {
        let a = link("1", "A", "a.com", &[]);
        let b = link("2", "B", "b.com", &[]);
        let mut editor = RowEditor::default();
        editor.begin(&a).unwrap();
        editor.draft_mut().unwrap().title = "changed".to_string();

        assert_eq!(
            editor.begin(&b),
            Err(EditError::InProgress { id: "1".to_string() })
        );
        editor.begin(&a).unwrap();
        assert_eq!(editor.draft().unwrap().title, "changed");
    }

    #[test]
    fn empty_title_restores_committed_values_without_update() {
        let l = link("1", "A", "a.com", &[]);
        let mut editor = RowEditor::default();
        editor.begin(&l).unwrap();
        {
            let draft = editor.draft_mut().unwrap();
            draft.title = "   ".to_string();
            draft.url = "changed.com".to_string();
        }
        assert_eq!(editor.commit(&l), Ok(CommitDecision::Rejected));
        assert_eq!(editor, RowEditor::Viewing);

        let view = editor.row_view(&l);
        assert_eq!(view.title, "A");
        assert_eq!(view.url, "a.com");
    }

    #[test]
    fn tag_only_change_is_submitted() {
        let l = link("1", "A", "a.com", &["work"]);
        let mut editor = RowEditor::default();
        editor.begin(&l).unwrap();
        editor
            .draft_mut()
            .unwrap()
            .set_tags_from_input("work, rust")
            .unwrap();

        let decision = editor.commit(&l).unwrap();
        assert_eq!(
            decision,
            CommitDecision::Submit(
                LinkPatch::new("1")
                    .with_url("a.com")
                    .with_title("A")
                    .with_tags(vec!["work".to_string(), "rust".to_string()])
            )
        );
        assert_eq!(editor.mode_of("1"), RowMode::Updating);
        assert!(editor.draft_mut().is_err());

        editor.finish_update();
        assert_eq!(editor, RowEditor::Viewing);
    }

    #[test]
    fn submitted_values_are_trimmed() {
        let l = link("1", "A", "a.com", &[]);
        let mut editor = RowEditor::default();
        editor.begin(&l).unwrap();
        editor.draft_mut().unwrap().title = "  New title ".to_string();
        let CommitDecision::Submit(patch) = editor.commit(&l).unwrap() else {
            panic!("expected submit");
        };
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert_eq!(patch.url.as_deref(), Some("a.com"));
    }

    #[test]
    fn whitespace_only_difference_is_unchanged() {
        let l = link("1", "A", "a.com", &[]);
        let mut editor = RowEditor::default();
        editor.begin(&l).unwrap();
        editor.draft_mut().unwrap().url = " a.com ".to_string();
        assert_eq!(editor.commit(&l), Ok(CommitDecision::Unchanged));
        assert!(!editor.is_active());
    }

    #[test]
    fn commit_requires_the_edited_row() {
        let a = link("1", "A", "a.com", &[]);
        let b = link("2", "B", "b.com", &[]);
        let mut editor = RowEditor::default();
        assert_eq!(editor.commit(&a), Err(EditError::NotEditing));

        editor.begin(&a).unwrap();
        assert_eq!(editor.commit(&b), Err(EditError::NotEditing));
        assert_eq!(editor.mode_of("1"), RowMode::Editing);
    }

    #[test]
    fn other_rows_are_dimmed_and_show_committed_values() {
        let a = link("1", "A", "a.com", &[]);
        let mut b = link("2", "B", "b.com", &[]);
        let mut editor = RowEditor::default();
        editor.begin(&a).unwrap();
        editor.draft_mut().unwrap().title = "Draft".to_string();

        let va = editor.row_view(&a);
        assert_eq!(va.title, "Draft");
        assert!(!va.dimmed);

        b.title = "Changed elsewhere".to_string();
        let vb = editor.row_view(&b);
        assert!(vb.dimmed);
        assert_eq!(vb.title, "Changed elsewhere");

        editor.cancel();
        assert!(!editor.row_view(&b).dimmed);
        assert_eq!(editor.row_view(&a).title, "A");
    }
}
