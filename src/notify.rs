use parking_lot::Mutex;

use crate::prelude::*;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Level {
    #[display(fmt = "info")]
    Info,
    #[display(fmt = "error")]
    Error,
}

/// A non-blocking message for the user (a toast, a status line).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "[{level}] {message}")]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }
}

/// User-visible notification channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Info => tracing::info!(text = %notification.message, "user notification"),
            Level::Error => tracing::warn!(text = %notification.message, "user notification"),
        }
    }
}

/// Keeps notifications until drained.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    pending: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes everything received so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.pending.lock().push(notification);
    }
}
