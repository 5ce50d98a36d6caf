//! Notifier implementations.

use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;

use super::{Notification, Notifier, Variant};

/// Records notifications in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent so far, oldest first
    pub fn snapshot(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Drain the recorded notifications
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().push(notification);
    }
}

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn format(notification: &Notification) -> String {
        let badge = format!("[{}]", notification.variant);
        let badge = match notification.variant {
            Variant::Success => badge
                .if_supports_color(Stream::Stderr, |s| s.green())
                .to_string(),
            Variant::Info => badge
                .if_supports_color(Stream::Stderr, |s| s.cyan())
                .to_string(),
            Variant::Warning => badge
                .if_supports_color(Stream::Stderr, |s| s.yellow())
                .to_string(),
            Variant::Danger => badge
                .if_supports_color(Stream::Stderr, |s| s.red())
                .to_string(),
        };

        match &notification.description {
            Some(description) => format!("{badge} {}: {description}", notification.title),
            None => format!("{badge} {}", notification.title),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            variant = %notification.variant,
            "notification: {}",
            notification.title
        );
        eprintln!("{}", Self::format(&notification));
    }
}
