//! # linkdeck-state
//!
//! Client-side state for a link list.
//!
//! - [`LinkStore`]: cache of collections keyed by user identity
//! - [`LinkCollection`]: filtered views plus create/update/delete/pin/unpin
//!   with per-operation [`MutationPolicies`]
//! - [`Notifier`]: sink for transient status messages
//! - [`RowEditor`]: the single-row inline edit state machine
//! - [`ListCursor`] and [`ListController`]: keyboard selection over the view

pub mod collection;
pub mod controller;
pub mod cursor;
pub mod edit;
pub mod notify;
pub mod policy;
pub mod session;
pub mod store;

pub use collection::{LinkCollection, Visit};
pub use controller::ListController;
pub use cursor::ListCursor;
pub use edit::{CommitDecision, CommitOutcome, Draft, RowEditor, RowMode, RowView};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use policy::{FailurePolicy, MutationKind, MutationPolicies, MutationPolicy};
pub use session::{Session, UserId};
pub use store::LinkStore;
