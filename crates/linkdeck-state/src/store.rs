//! Cache of link collections keyed by user identity.
//!
//! The store is an explicit handle: clones share the same cache, so a
//! session's collection state and its background tasks see the same data.
//! Writes are last-write-wins and every write leaves the collection in
//! canonical order.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use linkdeck_core::{apply_pin_and_sort, Link};

use crate::session::UserId;

#[derive(Debug, Clone, Default)]
pub struct LinkStore {
    inner: Arc<RwLock<HashMap<UserId, Vec<Link>>>>,
}

impl LinkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<UserId, Vec<Link>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<UserId, Vec<Link>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a collection has been cached for `user`.
    #[must_use]
    pub fn contains(&self, user: &UserId) -> bool {
        self.read().contains_key(user)
    }

    /// The cached collection, empty when nothing is cached.
    #[must_use]
    pub fn get(&self, user: &UserId) -> Vec<Link> {
        self.read().get(user).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn find(&self, user: &UserId, id: &str) -> Option<Link> {
        self.read()
            .get(user)
            .and_then(|links| links.iter().find(|l| l.id == id).cloned())
    }

    /// Replace the cached collection.
    pub fn set(&self, user: &UserId, mut links: Vec<Link>) {
        apply_pin_and_sort(&mut links);
        debug!(%user, count = links.len(), "cache set");
        self.write().insert(user.clone(), links);
    }

    /// Change the cached collection in place, then restore canonical order.
    pub fn patch<R>(&self, user: &UserId, f: impl FnOnce(&mut Vec<Link>) -> R) -> R {
        let mut cache = self.write();
        let links = cache.entry(user.clone()).or_default();
        let out = f(links);
        apply_pin_and_sort(links);
        debug!(%user, count = links.len(), "cache patched");
        out
    }

    /// Merge a record into the cache by id. Returns false when it is not cached.
    pub fn replace(&self, user: &UserId, link: Link) -> bool {
        self.patch(user, |links| match links.iter_mut().find(|l| l.id == link.id) {
            Some(slot) => {
                *slot = link;
                true
            }
            None => false,
        })
    }

    /// Drop the cached collection for `user`.
    pub fn clear(&self, user: &UserId) {
        self.write().remove(user);
    }
}
