//! In-memory link backend.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use linkdeck_core::{ClientError, Link, LinkPatch, NewLink};

use crate::{ClientResult, LinkClient};

/// Client operation kinds, used for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// A call received by [`MemoryLinkClient`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    List,
    Create(NewLink),
    Update(LinkPatch),
    Delete(String),
}

/// Keeps the collection in process memory.
///
/// Every call is recorded before it runs, including calls that fail through
/// [`MemoryLinkClient::fail_on`].
#[derive(Debug, Default)]
pub struct MemoryLinkClient {
    links: Mutex<Vec<Link>>,
    calls: Mutex<Vec<ClientCall>>,
    failing: Mutex<HashSet<Operation>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryLinkClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing collection.
    #[must_use]
    pub fn with_links(links: Vec<Link>) -> Self {
        Self {
            links: Mutex::new(links),
            ..Self::default()
        }
    }

    /// Make every subsequent call of `op` fail with [`ClientError::Unavailable`].
    pub fn fail_on(&self, op: Operation) {
        lock(&self.failing).insert(op);
    }

    /// Undo [`MemoryLinkClient::fail_on`].
    pub fn recover(&self, op: Operation) {
        lock(&self.failing).remove(&op);
    }

    /// Snapshot of the stored collection.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        lock(&self.links).clone()
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: ClientCall, op: Operation) -> ClientResult<()> {
        debug!(?call, "memory client call");
        lock(&self.calls).push(call);
        if lock(&self.failing).contains(&op) {
            return Err(ClientError::Unavailable(format!("{op:?} disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkClient for MemoryLinkClient {
    async fn list(&self) -> ClientResult<Vec<Link>> {
        self.record(ClientCall::List, Operation::List)?;
        Ok(self.links())
    }

    async fn create(&self, link: NewLink) -> ClientResult<Link> {
        self.record(ClientCall::Create(link.clone()), Operation::Create)?;
        let created = Link {
            id: Uuid::new_v4().to_string(),
            url: link.url,
            title: link.title,
            tags: Vec::new(),
            created_at: Utc::now(),
            visited_at: None,
        };
        lock(&self.links).push(created.clone());
        Ok(created)
    }

    async fn update(&self, patch: LinkPatch) -> ClientResult<Link> {
        self.record(ClientCall::Update(patch.clone()), Operation::Update)?;
        let mut links = lock(&self.links);
        let link = links
            .iter_mut()
            .find(|l| l.id == patch.id)
            .ok_or_else(|| ClientError::NotFound(patch.id.clone()))?;
        link.apply(&patch);
        Ok(link.clone())
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.record(ClientCall::Delete(id.to_string()), Operation::Delete)?;
        let mut links = lock(&self.links);
        let before = links.len();
        links.retain(|l| l.id != id);
        if links.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let client = MemoryLinkClient::new();
        let before = Utc::now();
        let link = client.create(NewLink::new("a.com", "A")).await.unwrap();
        assert!(!link.id.is_empty());
        assert!(link.created_at >= before);
        assert!(link.tags.is_empty());
        assert_eq!(client.list().await.unwrap(), vec![link]);
    }

    #[tokio::test]
    async fn update_merges_and_returns_record() {
        let client = MemoryLinkClient::new();
        let link = client.create(NewLink::new("a.com", "A")).await.unwrap();
        let updated = client
            .update(LinkPatch::new(&link.id).with_tags(vec!["work".to_string()]))
            .await
            .unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.tags, vec!["work"]);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let client = MemoryLinkClient::new();
        assert!(matches!(
            client.update(LinkPatch::new("nope")).await,
            Err(ClientError::NotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            client.delete("nope").await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn injected_failures_are_recorded() {
        let client = MemoryLinkClient::new();
        client.fail_on(Operation::Create);
        assert!(client.create(NewLink::new("a.com", "A")).await.is_err());
        assert!(client.links().is_empty());
        assert_eq!(
            client.calls(),
            vec![ClientCall::Create(NewLink::new("a.com", "A"))]
        );

        client.recover(Operation::Create);
        assert!(client.create(NewLink::new("a.com", "A")).await.is_ok());
    }
}
