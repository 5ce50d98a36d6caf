//! The add-group wizard's submit and cancel paths.

use crate::notify::{Notifier, Variant, messages};
use crate::remote::{Group, NewGroup, RbacApi, RemoteError};

use super::entity::Groups;
use super::screen::ListScreen;

/// How a submitted group settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddGroupOutcome {
    Created(Group),
    /// Another group already has this name; the wizard stays open
    NameTaken,
    Failed(RemoteError),
}

impl AddGroupOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, AddGroupOutcome::Created(_))
    }
}

/// What closing the wizard does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    /// The draft has input; ask before discarding it
    NeedsConfirmation,
}

/// Create `group` and bring the groups list back to its first page.
///
/// Filters and pagination are reset before the request is sent so the
/// refreshed list starts from a clean view. A duplicate name is reported as
/// [`AddGroupOutcome::NameTaken`] with a warning and no refresh.
pub async fn submit_new_group<A, N>(
    screen: &mut ListScreen<'_, Groups, A, N>,
    group: NewGroup,
) -> AddGroupOutcome
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    screen.controller_mut().reset_view();

    let api = screen.api();
    let notifier = screen.notifier();
    match api.add_group(&group).await {
        Ok(created) => {
            tracing::info!("created group '{}' ({})", created.name, created.uuid);
            notifier.notify(messages::ADD_GROUP.success.to_notification(Variant::Success));
            screen.refresh().await;
            AddGroupOutcome::Created(created)
        }
        Err(err) if err.is_name_conflict() => {
            tracing::warn!("group name '{}' is taken: {err}", group.name);
            notifier.notify(messages::ADD_GROUP_NAME_TAKEN.to_notification(Variant::Warning));
            AddGroupOutcome::NameTaken
        }
        Err(err) => {
            tracing::warn!("failed to create group '{}': {err}", group.name);
            notifier.notify(messages::ADD_GROUP.failure.to_notification(Variant::Danger));
            AddGroupOutcome::Failed(err)
        }
    }
}

/// Close the wizard. An untouched draft is dropped right away.
pub fn cancel_new_group<N: Notifier + ?Sized>(notifier: &N, draft: &NewGroup) -> CancelOutcome {
    if draft.is_empty() {
        confirm_cancel(notifier);
        CancelOutcome::Canceled
    } else {
        CancelOutcome::NeedsConfirmation
    }
}

/// The user confirmed discarding a draft
pub fn confirm_cancel<N: Notifier + ?Sized>(notifier: &N) {
    tracing::debug!("add group wizard canceled");
    notifier.notify(messages::ADD_GROUP_CANCELED.to_notification(Variant::Warning));
}
