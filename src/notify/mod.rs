//! User-facing notifications and the mutation wrapper that emits them.
//!
//! Every remote mutation triggered from a list screen runs through [`run`]:
//! it awaits the mutation, emits a success or failure notification, and
//! hands back a typed [`MutationOutcome`]. It never fails to the caller, so
//! follow-up work (a list refresh) can branch on the outcome alone.

pub mod messages;
pub mod sinks;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::remote::{RemoteError, RemoteResult};

pub use sinks::{ConsoleNotifier, MemoryNotifier};

/// How long a notification stays on screen
pub const DISMISS_DELAY: Duration = Duration::from_millis(8000);

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Info,
    Warning,
    Danger,
}

enum_str!(Variant, "notification variant", {
    Success => "success",
    Info => "info",
    Warning => "warning",
    Danger => "danger",
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: Variant,
    pub title: String,
    pub description: Option<String>,
    pub dismiss_delay: Duration,
    pub dismissable: bool,
}

impl Notification {
    pub fn new(variant: Variant, title: impl Into<String>) -> Self {
        Self {
            variant,
            title: title.into(),
            description: None,
            dismiss_delay: DISMISS_DELAY,
            dismissable: true,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Variant::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(Variant::Info, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Variant::Warning, title)
    }

    pub fn danger(title: impl Into<String>) -> Self {
        Self::new(Variant::Danger, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Fire-and-forget notification surface
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Title and optional description of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub title: &'static str,
    pub description: Option<&'static str>,
}

impl Message {
    pub const fn new(title: &'static str) -> Self {
        Self {
            title,
            description: None,
        }
    }

    pub const fn described(title: &'static str, description: &'static str) -> Self {
        Self {
            title,
            description: Some(description),
        }
    }

    pub fn to_notification(&self, variant: Variant) -> Notification {
        let notification = Notification::new(variant, self.title);
        match self.description {
            Some(description) => notification.with_description(description),
            None => notification,
        }
    }
}

/// Messages for the two ways a mutation can settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSet {
    pub success: Message,
    pub failure: Message,
}

/// Message sets for a mutation on one entity or on a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralMessages {
    pub single: MessageSet,
    pub plural: MessageSet,
}

impl PluralMessages {
    pub fn select(&self, count: usize) -> &MessageSet {
        if count > 1 { &self.plural } else { &self.single }
    }
}

/// How a mutation settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    Fulfilled(T),
    Rejected(RemoteError),
}

impl<T> MutationOutcome<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, MutationOutcome::Fulfilled(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            MutationOutcome::Fulfilled(value) => Some(value),
            MutationOutcome::Rejected(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            MutationOutcome::Fulfilled(value) => MutationOutcome::Fulfilled(f(value)),
            MutationOutcome::Rejected(err) => MutationOutcome::Rejected(err),
        }
    }
}

impl<T> From<RemoteResult<T>> for MutationOutcome<T> {
    fn from(result: RemoteResult<T>) -> Self {
        match result {
            Ok(value) => MutationOutcome::Fulfilled(value),
            Err(err) => MutationOutcome::Rejected(err),
        }
    }
}

/// Await `mutation` and report how it settled.
///
/// Emits a success notification on fulfillment and a danger notification on
/// rejection, both with [`DISMISS_DELAY`]. Never fails.
pub async fn run<T, N, F>(notifier: &N, mutation: F, messages: &MessageSet) -> MutationOutcome<T>
where
    N: Notifier + ?Sized,
    F: Future<Output = RemoteResult<T>>,
{
    let outcome = MutationOutcome::from(mutation.await);
    match &outcome {
        MutationOutcome::Fulfilled(_) => {
            tracing::info!("{}", messages.success.title);
            notifier.notify(messages.success.to_notification(Variant::Success));
        }
        MutationOutcome::Rejected(err) => {
            tracing::warn!("{}: {err}", messages.failure.title);
            notifier.notify(messages.failure.to_notification(Variant::Danger));
        }
    }
    outcome
}
