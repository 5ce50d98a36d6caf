//! Async driver for a list controller.
//!
//! A [`ListScreen`] pairs a [`ListController`] with the backend and the
//! notification surface. Each event handler runs the controller transition,
//! awaits the resulting fetch and feeds the response back, one event at a
//! time.

use thiserror::Error;

use crate::error::Result;
use crate::notify::{self, Message, MutationOutcome, Notifier, PluralMessages, Variant, messages};
use crate::query::{FilterSet, FilterValue, Location, SortDirection};
use crate::remote::{ListRequest, RbacApi, RemoteResult, UserPatch};
use crate::types::{Identity, UserStatus, is_self_action};

use super::controller::{ListController, ListOptions, PendingFetch};
use super::entity::{Groups, ListEntity, Users};

/// Rows requested when resolving a username that is not loaded
const USER_LOOKUP_LIMIT: u32 = 20;

/// Why a mutation was not dispatched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    #[error("nothing selected")]
    NothingSelected,

    #[error("'{0}' is the acting identity")]
    SelfAction(String),

    #[error("'{0}' may not manage users")]
    NotPermitted(String),

    #[error("group '{0}' is a default group")]
    ProtectedGroup(String),
}

pub struct ListScreen<'a, E: ListEntity, A: RbacApi, N: Notifier + ?Sized> {
    controller: ListController<E>,
    api: &'a A,
    notifier: &'a N,
    identity: Identity,
}

impl<'a, E, A, N> ListScreen<'a, E, A, N>
where
    E: ListEntity,
    A: RbacApi,
    N: Notifier + ?Sized,
{
    pub fn new(
        options: ListOptions,
        location: Location,
        api: &'a A,
        notifier: &'a N,
        identity: Identity,
    ) -> Self {
        Self {
            controller: ListController::new(options, location),
            api,
            notifier,
            identity,
        }
    }

    pub fn controller(&self) -> &ListController<E> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListController<E> {
        &mut self.controller
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub(crate) fn api(&self) -> &'a A {
        self.api
    }

    pub(crate) fn notifier(&self) -> &'a N {
        self.notifier
    }

    /// Run a fetch issued by the controller and apply its result
    pub(crate) async fn run(&mut self, pending: PendingFetch) {
        let result = E::fetch(self.api, &pending.request).await;
        self.controller.complete(pending.token, result);
    }

    pub async fn mount(&mut self) {
        let pending = self.controller.mount();
        self.run(pending).await;
    }

    pub async fn edit_filters<I, K>(&mut self, patch: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, FilterValue)>,
        K: Into<String>,
    {
        let pending = self.controller.edit_filters(patch)?;
        self.run(pending).await;
        Ok(())
    }

    pub async fn clear_filters(&mut self) {
        let pending = self.controller.clear_filters();
        self.run(pending).await;
    }

    pub async fn change_page(&mut self, page: u32) {
        let pending = self.controller.change_page(page);
        self.run(pending).await;
    }

    pub async fn change_limit(&mut self, limit: u32) {
        let pending = self.controller.change_limit(limit);
        self.run(pending).await;
    }

    pub async fn change_sort(&mut self, column_index: usize, direction: SortDirection) -> Result<()> {
        let pending = self.controller.change_sort(column_index, direction)?;
        self.run(pending).await;
        Ok(())
    }

    pub async fn refresh(&mut self) {
        let pending = self.controller.refresh();
        self.run(pending).await;
    }

    fn refuse(&self, refusal: Refusal, message: &Message) -> Refusal {
        tracing::warn!("{} mutation refused: {refusal}", E::NAME);
        self.notifier.notify(message.to_notification(Variant::Warning));
        refusal
    }

    async fn settle<T>(&mut self, outcome: &MutationOutcome<T>) {
        if let Some(pending) = self.controller.on_mutation_settled(outcome) {
            self.run(pending).await;
        }
    }

    /// Explicit targets, or the current selection when `targets` is empty
    fn targets(&self, targets: &[String]) -> Vec<String> {
        if targets.is_empty() {
            self.controller.selection().uuids()
        } else {
            targets.to_vec()
        }
    }
}

// ============================================================================
// User mutations
// ============================================================================

impl<'a, A, N> ListScreen<'a, Users, A, N>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    /// Refuse user mutations by unprivileged identities or on the acting identity
    fn guard_users(&self, usernames: &[String]) -> std::result::Result<(), Refusal> {
        if usernames.is_empty() {
            return Err(Refusal::NothingSelected);
        }
        if !self.identity.can_manage_users() {
            return Err(self.refuse(
                Refusal::NotPermitted(self.identity.username.clone()),
                &messages::NOT_PERMITTED,
            ));
        }
        if let Some(own) = usernames
            .iter()
            .find(|u| is_self_action(&self.identity.username, u))
        {
            return Err(self.refuse(
                Refusal::SelfAction(own.clone()),
                &messages::SELF_ACTION_REFUSED,
            ));
        }
        Ok(())
    }

    /// Patch targets keyed by the backend id. Users off the loaded page are
    /// looked up by username, whatever their status.
    async fn patches(&self, usernames: &[String]) -> RemoteResult<Vec<UserPatch>> {
        let api = self.api;
        let lookups = usernames.iter().map(|username| async move {
            if let Some(row) = self.controller.row(username) {
                return RemoteResult::Ok(UserPatch::for_user(&row.record));
            }
            let filters = FilterSet::new()
                .with("username", FilterValue::text(username.as_str()))
                .with(
                    "status",
                    FilterValue::multi(UserStatus::ALL_STRINGS.iter().copied()),
                );
            let request = ListRequest::new(USER_LOOKUP_LIMIT, 0).with_filters(filters);
            let page = api.fetch_users(&request).await?;
            Ok(match page.items.iter().find(|u| u.username == *username) {
                Some(user) => UserPatch::for_user(user),
                None => {
                    tracing::debug!("no backend id for {username}, patching by username");
                    UserPatch {
                        username: username.clone(),
                        ..Default::default()
                    }
                }
            })
        });
        futures::future::try_join_all(lookups).await
    }

    async fn apply_user_patches<F>(
        &mut self,
        usernames: &[String],
        change: F,
        catalog: &PluralMessages,
    ) -> std::result::Result<MutationOutcome<()>, Refusal>
    where
        F: Fn(UserPatch) -> UserPatch,
    {
        let targets = self.targets(usernames);
        self.guard_users(&targets)?;

        let api = self.api;
        let set = catalog.select(targets.len());
        let outcome = match self.patches(&targets).await {
            Ok(patches) => {
                let patches: Vec<_> = patches.into_iter().map(change).collect();
                notify::run(self.notifier, api.update_users(&patches), set).await
            }
            Err(err) => notify::run(self.notifier, std::future::ready(Err(err)), set).await,
        };
        self.settle(&outcome).await;
        Ok(outcome)
    }

    /// Activate or deactivate users; an empty `usernames` targets the selection
    pub async fn set_users_active(
        &mut self,
        usernames: &[String],
        active: bool,
    ) -> std::result::Result<MutationOutcome<()>, Refusal> {
        let catalog = if active {
            &messages::ACTIVATE_USERS
        } else {
            &messages::DEACTIVATE_USERS
        };
        self.apply_user_patches(usernames, |p| p.active(active), catalog)
            .await
    }

    /// Grant or revoke organization administrator status
    pub async fn set_users_org_admin(
        &mut self,
        usernames: &[String],
        org_admin: bool,
    ) -> std::result::Result<MutationOutcome<()>, Refusal> {
        let catalog = if org_admin {
            &messages::PROMOTE_ORG_ADMIN
        } else {
            &messages::DEMOTE_ORG_ADMIN
        };
        self.apply_user_patches(usernames, |p| p.org_admin(org_admin), catalog)
            .await
    }
}

// ============================================================================
// Group mutations
// ============================================================================

impl<'a, A, N> ListScreen<'a, Groups, A, N>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    /// Name of the first default group among `targets`. Targets that are not
    /// loaded are checked against the backend's default groups.
    async fn protected_target(&self, targets: &[String]) -> RemoteResult<Option<String>> {
        if let Some(row) = targets
            .iter()
            .filter_map(|uuid| self.controller.row(uuid))
            .find(|row| row.record.is_default())
        {
            return Ok(Some(row.label.clone()));
        }
        if targets.iter().all(|uuid| self.controller.row(uuid).is_some()) {
            return Ok(None);
        }

        let (system, admin) = futures::try_join!(
            self.api.fetch_system_group(None),
            self.api.fetch_admin_group(None)
        )?;
        Ok([system, admin]
            .into_iter()
            .flatten()
            .find(|group| targets.contains(&group.uuid))
            .map(|group| group.name))
    }

    /// Delete groups; an empty `uuids` targets the selection
    pub async fn remove_groups(
        &mut self,
        uuids: &[String],
    ) -> std::result::Result<MutationOutcome<()>, Refusal> {
        let targets = self.targets(uuids);
        if targets.is_empty() {
            return Err(Refusal::NothingSelected);
        }

        let api = self.api;
        let catalog = &messages::REMOVE_GROUPS;
        let set = catalog.select(targets.len());
        let outcome = match self.protected_target(&targets).await {
            Ok(Some(name)) => {
                return Err(self.refuse(
                    Refusal::ProtectedGroup(name),
                    &messages::PROTECTED_GROUP,
                ));
            }
            Ok(None) => notify::run(self.notifier, api.remove_groups(&targets), set).await,
            Err(err) => notify::run(self.notifier, std::future::ready(Err(err)), set).await,
        };
        self.settle(&outcome).await;
        Ok(outcome)
    }
}
