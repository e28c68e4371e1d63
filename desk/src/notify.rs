use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

/// Queue of notifications waiting to be shown.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title.into(), description.into(), NotificationKind::Info);
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title.into(), description.into(), NotificationKind::Error);
    }

    fn push(&mut self, title: String, description: String, kind: NotificationKind) {
        match kind {
            NotificationKind::Info => info!("{}: {}", title, description),
            NotificationKind::Error => warn!("{}: {}", title, description),
        }
        self.pending.push(Notification {
            title,
            description,
            kind,
        });
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.pending.last()
    }

    /// Hand every pending notification to the caller, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}
