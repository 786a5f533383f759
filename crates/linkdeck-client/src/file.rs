//! JSON file backend.
//!
//! The file holds every user's collection:
//!
//! ```json
//! { "users": { "alice": [ { "id": "…", "url": "…", … } ] } }
//! ```
//!
//! Each call reads the document, applies its change and writes it back
//! through a temporary file and rename.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use linkdeck_core::{ClientError, Link, LinkPatch, NewLink};

use crate::{ClientResult, LinkClient};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LinkFile {
    #[serde(default)]
    users: BTreeMap<String, Vec<Link>>,
}

/// Stores links in a JSON file, scoped to one user.
#[derive(Debug)]
pub struct FileLinkClient {
    path: PathBuf,
    user_id: String,
    write_lock: Mutex<()>,
}

impl FileLinkClient {
    /// Use the file at `path` for `user_id`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            user_id: user_id.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> ClientResult<LinkFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(LinkFile::default()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ClientError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LinkFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &LinkFile) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read, let `f` change this user's collection, write back.
    async fn modify<T: Send>(
        &self,
        f: impl FnOnce(&mut Vec<Link>) -> ClientResult<T> + Send,
    ) -> ClientResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        let links = file.users.entry(self.user_id.clone()).or_default();
        let out = f(links)?;
        self.write(&file).await?;
        Ok(out)
    }
}

#[async_trait]
impl LinkClient for FileLinkClient {
    async fn list(&self) -> ClientResult<Vec<Link>> {
        let mut file = self.read().await?;
        let links = file.users.remove(&self.user_id).unwrap_or_default();
        debug!(path = %self.path.display(), count = links.len(), "listed links");
        Ok(links)
    }

    async fn create(&self, link: NewLink) -> ClientResult<Link> {
        let created = Link {
            id: Uuid::new_v4().to_string(),
            url: link.url,
            title: link.title,
            tags: Vec::new(),
            created_at: Utc::now(),
            visited_at: None,
        };
        let stored = created.clone();
        self.modify(move |links| {
            links.push(stored);
            Ok(())
        })
        .await?;
        info!(id = %created.id, "created link");
        Ok(created)
    }

    async fn update(&self, patch: LinkPatch) -> ClientResult<Link> {
        let updated = self
            .modify(|links| {
                let link = links
                    .iter_mut()
                    .find(|l| l.id == patch.id)
                    .ok_or_else(|| ClientError::NotFound(patch.id.clone()))?;
                link.apply(&patch);
                Ok(link.clone())
            })
            .await?;
        debug!(id = %updated.id, "updated link");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.modify(|links| {
            let before = links.len();
            links.retain(|l| l.id != id);
            if links.len() == before {
                return Err(ClientError::NotFound(id.to_string()));
            }
            Ok(())
        })
        .await?;
        info!(%id, "deleted link");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let client = FileLinkClient::new(dir.path().join("links.json"), "alice");
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn crud_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("links.json");
        let client = FileLinkClient::new(&path, "alice");

        let link = client.create(NewLink::new("a.com", "A")).await.unwrap();
        assert!(path.exists());

        let reopened = FileLinkClient::new(&path, "alice");
        assert_eq!(reopened.list().await.unwrap(), vec![link.clone()]);

        let updated = reopened
            .update(LinkPatch::new(&link.id).with_title("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(client.list().await.unwrap()[0].title, "Renamed");

        client.delete(&link.id).await.unwrap();
        assert!(reopened.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn users_are_partitioned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        let alice = FileLinkClient::new(&path, "alice");
        let bob = FileLinkClient::new(&path, "bob");

        alice.create(NewLink::new("a.com", "A")).await.unwrap();
        bob.create(NewLink::new("b.com", "B")).await.unwrap();

        let alice_links = alice.list().await.unwrap();
        assert_eq!(alice_links.len(), 1);
        assert_eq!(alice_links[0].url, "a.com");
        assert!(matches!(
            bob.delete(&alice_links[0].id).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{ not json").unwrap();
        let client = FileLinkClient::new(&path, "alice");
        assert!(matches!(
            client.list().await,
            Err(ClientError::Serialization(_))
        ));
    }
}
