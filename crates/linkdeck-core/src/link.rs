//! Link type: a saved bookmark and the requests that create or change one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tags::{dedup_tags, PINNED_TAG};

/// A saved bookmark. The `id` is assigned by the backend and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(alias = "uuid")]
    pub id: String,

    pub url: String,

    pub title: String,

    /// Rendered in array order, compared as a set.
    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Whether the link carries the reserved `pinned` tag.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.tags.iter().any(|t| t == PINNED_TAG)
    }

    /// Whether the link carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tag array after pinning: existing tags deduplicated, `pinned` appended once.
    #[must_use]
    pub fn pinned_tags(&self) -> Vec<String> {
        let mut tags = dedup_tags(&self.tags);
        if !tags.iter().any(|t| t == PINNED_TAG) {
            tags.push(PINNED_TAG.to_string());
        }
        tags
    }

    /// Tag array after unpinning: every `pinned` entry removed.
    #[must_use]
    pub fn unpinned_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| t.as_str() != PINNED_TAG)
            .cloned()
            .collect()
    }

    /// Merge the fields present in `patch` into this link.
    ///
    /// The id is never overwritten; a patch for another id is ignored.
    pub fn apply(&mut self, patch: &LinkPatch) {
        if patch.id != self.id {
            return;
        }
        if let Some(url) = &patch.url {
            self.url.clone_from(url);
        }
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(tags) = &patch.tags {
            self.tags.clone_from(tags);
        }
        if let Some(visited_at) = patch.visited_at {
            self.visited_at = Some(visited_at);
        }
    }

    /// The URL to open in a browser. Bare hosts get an `http://` prefix.
    #[must_use]
    pub fn destination(&self) -> String {
        let lower = self.url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            self.url.clone()
        } else {
            format!("http://{}", self.url)
        }
    }
}

/// Request to create a link. The backend assigns id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub url: String,
    pub title: String,
}

impl NewLink {
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Partial update of a link, addressed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPatch {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Utc>>,
}

impl LinkPatch {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn with_visited_at(mut self, visited_at: DateTime<Utc>) -> Self {
        self.visited_at = Some(visited_at);
        self
    }

    /// True when the patch carries no field to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.title.is_none()
            && self.tags.is_none()
            && self.visited_at.is_none()
    }
}
