//! Link collection state: the cached collection of one session, the derived
//! views over it and the mutations that change it.
//!
//! Optimistic mutations patch the cache before their first `.await`, so the
//! view reflects the action immediately. Confirmed-only mutations patch the
//! cache once the backend answered. There is no per-record lock: when two
//! mutations race on one record, the last cache patch wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use linkdeck_client::LinkClient;
use linkdeck_core::{
    distinct_tags, tag_chips, toggle_tag, EditError, Link, LinkError, LinkFilter, LinkPatch,
    NewLink, Result, TagChips,
};

use crate::controller::ListController;
use crate::edit::{CommitDecision, CommitOutcome};
use crate::notify::{Notifier, PhaseMessages, Tracker, COPIED_MESSAGE, EMPTY_FIELD_MESSAGE};
use crate::policy::{FailurePolicy, MutationKind, MutationPolicies, MutationPolicy};
use crate::session::{Session, UserId};
use crate::store::LinkStore;

/// Prefix of ids given to optimistically created links before the backend
/// assigned a real one.
pub const PROVISIONAL_ID_PREFIX: &str = "provisional-";

/// A link being opened.
#[derive(Debug)]
pub struct Visit {
    /// URL to hand to the browser.
    pub destination: String,
    /// Background update of the link's `visited_at`.
    pub handle: JoinHandle<()>,
}

pub struct LinkCollection {
    store: LinkStore,
    session: Session,
    client: Arc<dyn LinkClient>,
    notifier: Arc<dyn Notifier>,
    policies: MutationPolicies,
    filter: LinkFilter,
    provisional_seq: AtomicU64,
}

impl LinkCollection {
    #[must_use]
    pub fn new(
        store: LinkStore,
        session: Session,
        client: Arc<dyn LinkClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            session,
            client,
            notifier,
            policies: MutationPolicies::default(),
            filter: LinkFilter::default(),
            provisional_seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_policies(mut self, policies: MutationPolicies) -> Self {
        self.policies = policies;
        self
    }

    #[must_use]
    pub fn policies(&self) -> MutationPolicies {
        self.policies
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn user(&self) -> &UserId {
        &self.session.user_id
    }

    // === Reads ===

    /// Fetch the collection from the backend and replace the cache with it.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Client`] if the backend call fails; the cache is
    /// left as it was.
    pub async fn load(&self) -> Result<Vec<Link>> {
        let links = self.client.list().await?;
        info!(user = %self.user(), count = links.len(), "loaded links");
        self.store.set(self.user(), links);
        Ok(self.all_links())
    }

    /// The whole cached collection in canonical order.
    #[must_use]
    pub fn all_links(&self) -> Vec<Link> {
        self.store.get(self.user())
    }

    /// The visible list: the cached collection narrowed by search and tags.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        let all = self.all_links();
        self.filter.apply(&all).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<Link> {
        self.store.find(self.user(), id)
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.filter.query
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    #[must_use]
    pub fn selected_tags(&self) -> &[String] {
        &self.filter.tags
    }

    pub fn set_selected_tags(&mut self, tags: Vec<String>) {
        self.filter.tags = tags;
    }

    /// Click on a chip of the tag selector.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.filter.tags = toggle_tag(&self.filter.tags, tag);
    }

    /// Every tag in the collection, first-seen order.
    #[must_use]
    pub fn distinct_tags(&self) -> Vec<String> {
        distinct_tags(&self.all_links())
    }

    #[must_use]
    pub fn tag_chips(&self) -> TagChips {
        tag_chips(&self.all_links(), &self.filter.tags)
    }

    // === Mutations ===

    /// Create a link from trimmed `url` and `title`.
    ///
    /// # Errors
    ///
    /// [`LinkError::EmptyField`] without calling the backend, or
    /// [`LinkError::Client`] when the backend rejects the call.
    pub async fn create(&self, url: &str, title: &str) -> Result<Link> {
        let (url, title) = (url.trim(), title.trim());
        if url.is_empty() || title.is_empty() {
            self.notifier.warning(EMPTY_FIELD_MESSAGE);
            return Err(LinkError::EmptyField(if url.is_empty() { "url" } else { "title" }));
        }

        let policy = self.policies.for_kind(MutationKind::Create);
        let provisional = (policy == MutationPolicy::Optimistic).then(|| {
            let link = Link {
                id: format!(
                    "{PROVISIONAL_ID_PREFIX}{}",
                    self.provisional_seq.fetch_add(1, Ordering::Relaxed)
                ),
                url: url.to_string(),
                title: title.to_string(),
                tags: Vec::new(),
                created_at: Utc::now(),
                visited_at: None,
            };
            let id = link.id.clone();
            self.store.patch(self.user(), |links| links.insert(0, link));
            id
        });

        let tracker = Tracker::start(self.notifier.as_ref(), MutationKind::Create);
        match self.client.create(NewLink::new(url, title)).await {
            Ok(created) => {
                let stored = created.clone();
                self.store.patch(self.user(), |links| {
                    if let Some(pid) = &provisional {
                        links.retain(|l| l.id != *pid);
                    }
                    links.insert(0, stored);
                });
                info!(id = %created.id, "link created");
                tracker.succeeded();
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "create failed");
                // A provisional record has no backend identity to keep.
                if let Some(pid) = &provisional {
                    self.store
                        .patch(self.user(), |links| links.retain(|l| l.id != *pid));
                }
                tracker.failed();
                Err(err.into())
            }
        }
    }

    /// Send `patch` to the backend and merge it into the cached record.
    ///
    /// # Errors
    ///
    /// [`LinkError::Client`] when the backend rejects the call.
    pub async fn update(&self, patch: LinkPatch) -> Result<Link> {
        self.apply_update(MutationKind::Update, patch).await
    }

    /// Remove a link.
    ///
    /// # Errors
    ///
    /// [`LinkError::Client`] when the backend rejects the call. Under the
    /// default policies the link stays removed from the cache regardless.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let policy = self.policies.for_kind(MutationKind::Delete);
        let previous = self.find(id);

        if policy == MutationPolicy::Optimistic {
            self.remove_cached(id);
        }

        let tracker = Tracker::start(self.notifier.as_ref(), MutationKind::Delete);
        match self.client.delete(id).await {
            Ok(()) => {
                if policy == MutationPolicy::ConfirmedOnly {
                    self.remove_cached(id);
                }
                info!(%id, "link deleted");
                tracker.succeeded();
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                if policy == MutationPolicy::Optimistic
                    && self.policies.on_failure == FailurePolicy::Rollback
                {
                    if let Some(previous) = previous {
                        self.store.patch(self.user(), |links| {
                            if !links.iter().any(|l| l.id == previous.id) {
                                links.push(previous);
                            }
                        });
                    }
                }
                tracker.failed();
                Err(err.into())
            }
        }
    }

    /// Add the `pinned` tag.
    ///
    /// # Errors
    ///
    /// [`LinkError::NotFound`] if the link is not cached, otherwise
    /// [`LinkError::Client`] when the backend rejects the call.
    pub async fn pin(&self, id: &str) -> Result<Link> {
        self.change_tags(MutationKind::Pin, id, Link::pinned_tags)
            .await
    }

    /// Remove the `pinned` tag.
    ///
    /// # Errors
    ///
    /// See [`LinkCollection::pin`].
    pub async fn unpin(&self, id: &str) -> Result<Link> {
        self.change_tags(MutationKind::Unpin, id, Link::unpinned_tags)
            .await
    }

    /// Open a link: returns its destination and records the visit in the
    /// background. The visit update is fire-and-forget; failures are only
    /// logged. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`LinkError::NotFound`] if the link is not cached.
    pub fn visit(&self, id: &str) -> Result<Visit> {
        let link = self
            .find(id)
            .ok_or_else(|| LinkError::NotFound(id.to_string()))?;
        let patch = LinkPatch::new(&link.id).with_visited_at(Utc::now());

        let client = Arc::clone(&self.client);
        let store = self.store.clone();
        let user = self.user().clone();
        let handle = tokio::spawn(async move {
            match client.update(patch.clone()).await {
                Ok(_) => {
                    store.patch(&user, |links| {
                        if let Some(l) = links.iter_mut().find(|l| l.id == patch.id) {
                            l.apply(&patch);
                        }
                    });
                    debug!(id = %patch.id, "visit recorded");
                }
                Err(err) => warn!(id = %patch.id, error = %err, "visit update failed"),
            }
        });

        Ok(Visit {
            destination: link.destination(),
            handle,
        })
    }

    /// The url to put on the clipboard for a link, announced as copied.
    ///
    /// # Errors
    ///
    /// [`LinkError::NotFound`] if the link is not cached.
    pub fn copy(&self, id: &str) -> Result<String> {
        let link = self
            .find(id)
            .ok_or_else(|| LinkError::NotFound(id.to_string()))?;
        self.notifier.info(COPIED_MESSAGE);
        Ok(link.url)
    }

    /// Commit the row being edited in `controller`.
    ///
    /// An empty title or url discards the draft with a warning. A changed
    /// draft goes through [`LinkCollection::update`]; the row stays updating
    /// until it resolves and always ends up viewing.
    ///
    /// # Errors
    ///
    /// [`LinkError::Edit`] when no row is editing, [`LinkError::NotFound`]
    /// when the edited link left the cache (the draft is dropped), or the
    /// update's error.
    pub async fn commit_edit(&self, controller: &mut ListController) -> Result<CommitOutcome> {
        let Some(id) = controller.editor().active_id().map(str::to_string) else {
            return Err(EditError::NotEditing.into());
        };
        let Some(committed) = self.find(&id) else {
            controller.editor_mut().cancel();
            return Err(LinkError::NotFound(id));
        };

        match controller.editor_mut().commit(&committed)? {
            CommitDecision::Rejected => {
                self.notifier.warning(EMPTY_FIELD_MESSAGE);
                Ok(CommitOutcome::Rejected)
            }
            CommitDecision::Unchanged => Ok(CommitOutcome::Unchanged),
            CommitDecision::Submit(patch) => {
                let result = self.update(patch).await;
                controller.editor_mut().finish_update();
                result.map(CommitOutcome::Updated)
            }
        }
    }

    // === Internals ===

    fn remove_cached(&self, id: &str) {
        self.store
            .patch(self.user(), |links| links.retain(|l| l.id != id));
    }

    async fn change_tags(
        &self,
        kind: MutationKind,
        id: &str,
        tags: fn(&Link) -> Vec<String>,
    ) -> Result<Link> {
        let Some(link) = self.find(id) else {
            if let Some(msg) = PhaseMessages::for_kind(kind).announce {
                self.notifier.info(msg);
            }
            return Err(LinkError::NotFound(id.to_string()));
        };
        let patch = LinkPatch::new(&link.id).with_tags(tags(&link));
        self.apply_update(kind, patch).await
    }

    async fn apply_update(&self, kind: MutationKind, patch: LinkPatch) -> Result<Link> {
        let policy = self.policies.for_kind(kind);

        let previous = match policy {
            MutationPolicy::Optimistic => Some(
                self.find(&patch.id)
                    .ok_or_else(|| LinkError::NotFound(patch.id.clone()))?,
            ),
            MutationPolicy::ConfirmedOnly => None,
        };

        // Announce before the local patch becomes visible.
        let tracker = Tracker::start(self.notifier.as_ref(), kind);
        if let Some(previous) = &previous {
            let mut patched = previous.clone();
            patched.apply(&patch);
            self.store.replace(self.user(), patched);
        }

        match self.client.update(patch.clone()).await {
            Ok(remote) => {
                let cached = self.store.patch(self.user(), |links| {
                    links.iter_mut().find(|l| l.id == patch.id).map(|l| {
                        if policy == MutationPolicy::ConfirmedOnly {
                            l.apply(&patch);
                        }
                        l.clone()
                    })
                });
                info!(id = %patch.id, ?kind, "link updated");
                tracker.succeeded();
                Ok(cached.unwrap_or(remote))
            }
            Err(err) => {
                warn!(id = %patch.id, ?kind, error = %err, "update failed");
                if let Some(previous) = previous {
                    if self.policies.on_failure == FailurePolicy::Rollback {
                        self.store.replace(self.user(), previous);
                    }
                }
                tracker.failed();
                Err(err.into())
            }
        }
    }
}
