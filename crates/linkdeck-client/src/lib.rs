//! # linkdeck-client
//!
//! Remote CRUD for a user's link collection.
//!
//! The state layer only talks to a [`LinkClient`]; the backend behind it owns
//! persistence, id assignment and creation timestamps. Two backends ship here:
//! - [`MemoryLinkClient`]: in-process collection with call recording and
//!   failure injection
//! - [`FileLinkClient`]: JSON document on disk, partitioned by user id

use async_trait::async_trait;

use linkdeck_core::{ClientError, Link, LinkPatch, NewLink};

pub mod file;
pub mod memory;

pub use file::FileLinkClient;
pub use memory::{ClientCall, MemoryLinkClient, Operation};

/// Result type for client calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// CRUD operations against the backend collection of the current user.
#[async_trait]
pub trait LinkClient: Send + Sync {
    /// Fetch the whole collection, in backend order.
    async fn list(&self) -> ClientResult<Vec<Link>>;

    /// Create a link. The returned record carries the assigned id and `created_at`.
    async fn create(&self, link: NewLink) -> ClientResult<Link>;

    /// Merge `patch` into the stored record and return the result.
    async fn update(&self, patch: LinkPatch) -> ClientResult<Link>;

    async fn delete(&self, id: &str) -> ClientResult<()>;
}
