//! When a mutation touches the cache, declared per operation.

use serde::{Deserialize, Serialize};

/// The mutations exposed by [`crate::LinkCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Pin,
    Unpin,
}

/// Whether the cache is patched before or after the backend confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationPolicy {
    /// Patch the cache first, then call the backend.
    Optimistic,
    /// Call the backend and patch the cache only on success.
    ConfirmedOnly,
}

/// What an optimistic mutation does with its local patch when the backend fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the local patch in place until the next full reload.
    #[default]
    Keep,
    /// Restore the record as it was before the mutation.
    Rollback,
}

/// Policy table for every mutation.
///
/// The default keeps creates and updates confirmed-only and applies deletes,
/// pins and unpins optimistically without rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationPolicies {
    pub create: MutationPolicy,
    pub update: MutationPolicy,
    pub delete: MutationPolicy,
    pub pin: MutationPolicy,
    pub unpin: MutationPolicy,
    pub on_failure: FailurePolicy,
}

impl Default for MutationPolicies {
    fn default() -> Self {
        Self {
            create: MutationPolicy::ConfirmedOnly,
            update: MutationPolicy::ConfirmedOnly,
            delete: MutationPolicy::Optimistic,
            pin: MutationPolicy::Optimistic,
            unpin: MutationPolicy::Optimistic,
            on_failure: FailurePolicy::Keep,
        }
    }
}

impl MutationPolicies {
    #[must_use]
    pub fn for_kind(&self, kind: MutationKind) -> MutationPolicy {
        match kind {
            MutationKind::Create => self.create,
            MutationKind::Update => self.update,
            MutationKind::Delete => self.delete,
            MutationKind::Pin => self.pin,
            MutationKind::Unpin => self.unpin,
        }
    }
}
