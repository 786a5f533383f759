//! Transient status messages.
//!
//! Every mutation reports through a [`Notifier`]. The wording per operation is
//! fixed by [`PhaseMessages::for_kind`].

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use crate::policy::MutationKind;

/// Generic message for any backend failure.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

/// Warning shown when an edit is committed with an empty title or url.
pub const EMPTY_FIELD_MESSAGE: &str = "Title or url cannot be empty";

pub const COPIED_MESSAGE: &str = "Copied";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Pending,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for status messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Warning, message));
    }
}

/// Wording for the phases of one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMessages {
    /// Shown as soon as the action is triggered, independent of the outcome.
    pub announce: Option<&'static str>,
    pub pending: Option<&'static str>,
    pub success: Option<&'static str>,
    pub failure: &'static str,
}

impl PhaseMessages {
    #[must_use]
    pub fn for_kind(kind: MutationKind) -> Self {
        let (announce, pending, success) = match kind {
            MutationKind::Create => (None, Some("Creating link..."), Some("Link has been created")),
            MutationKind::Update => (None, None, Some("Link has been updated")),
            MutationKind::Delete => (None, Some("Removing link..."), Some("Link has been removed")),
            MutationKind::Pin => (Some("Pinned"), None, None),
            MutationKind::Unpin => (Some("Unpinned"), None, None),
        };
        Self {
            announce,
            pending,
            success,
            failure: FAILURE_MESSAGE,
        }
    }
}

/// Tracks one mutation through its notification phases.
pub(crate) struct Tracker<'a> {
    notifier: &'a dyn Notifier,
    messages: PhaseMessages,
}

impl<'a> Tracker<'a> {
    /// Emit the announce and pending messages.
    pub(crate) fn start(notifier: &'a dyn Notifier, kind: MutationKind) -> Self {
        let messages = PhaseMessages::for_kind(kind);
        if let Some(msg) = messages.announce {
            notifier.notify(Notification::new(NotificationLevel::Info, msg));
        }
        if let Some(msg) = messages.pending {
            notifier.notify(Notification::new(NotificationLevel::Pending, msg));
        }
        Self { notifier, messages }
    }

    pub(crate) fn succeeded(self) {
        if let Some(msg) = self.messages.success {
            self.notifier
                .notify(Notification::new(NotificationLevel::Success, msg));
        }
    }

    pub(crate) fn failed(self) {
        self.notifier.notify(Notification::new(
            NotificationLevel::Error,
            self.messages.failure,
        ));
    }
}

/// Writes notifications to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Warning | NotificationLevel::Error => {
                warn!(level = ?notification.level, "{}", notification.message);
            }
            _ => info!(level = ?notification.level, "{}", notification.message),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages only, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
