//! One-shot command handlers.

mod links;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use linkdeck_client::FileLinkClient;
use linkdeck_state::{
    LinkCollection, LinkStore, NotificationLevel, Notifier, RecordingNotifier, Session,
};

use crate::config::Config;
use crate::formatter::OutputFormat;

pub use links::{add, copy, edit, list, open, pin, remove, tags, unpin, EditArgs};

/// A loaded collection plus the sink its notifications land in.
pub struct App {
    pub collection: LinkCollection,
    pub notifier: Arc<RecordingNotifier>,
    pub format: OutputFormat,
    /// Paint selected tag chips with their palette color.
    pub color: bool,
    /// Whether `copy` writes to the system clipboard.
    pub clipboard: bool,
}

impl App {
    /// Build the file-backed collection for the configured user and load it.
    pub async fn open(config: &Config, format: OutputFormat, color: bool) -> Result<Self> {
        let client = Arc::new(FileLinkClient::new(&config.data_file, config.user.clone()));
        debug!(data_file = %client.path().display(), user = %config.user, "opening collection");
        let notifier = Arc::new(RecordingNotifier::new());
        let collection = LinkCollection::new(
            LinkStore::new(),
            Session::new(config.user.clone()),
            client,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        )
        .with_policies(config.policy);

        collection.load().await?;
        Ok(Self {
            collection,
            notifier,
            format,
            color,
            clipboard: config.clipboard,
        })
    }

    /// Print pending notifications to stderr.
    pub fn flush_notifications(&self) {
        for n in self.notifier.drain() {
            eprintln!("{}", status_line(n.level, &n.message));
        }
    }
}

pub fn status_line(level: NotificationLevel, message: &str) -> String {
    let tag = match level {
        NotificationLevel::Info => "info",
        NotificationLevel::Pending => "pending",
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {message}")
}

/// Put `text` on the system clipboard. Returns false when none is reachable.
pub fn write_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "clipboard unavailable");
            false
        }
    }
}
