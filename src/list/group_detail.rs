//! A single group with its members and roles.
//!
//! Loaded from a deep link, so the identifier may be malformed; that case is
//! reported as [`FetchOutcome::BadIdentifier`] rather than an error.

use serde::Serialize;

use crate::notify::{self, MutationOutcome, Notifier, messages};
use crate::remote::{
    FetchOutcome, Group, GroupPatch, ListPage, ListRequest, Principal, RbacApi, RemoteResult,
    Role, lookup_group,
};

/// Members and roles shown below a group
const DETAIL_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetail {
    pub group: Group,
    pub members: ListPage<Principal>,
    pub roles: ListPage<Role>,
}

/// Load a group and the first page of its members and roles
pub async fn load_group_detail<A: RbacApi>(
    api: &A,
    raw_uuid: &str,
) -> RemoteResult<FetchOutcome<GroupDetail>> {
    let group = match lookup_group(api, raw_uuid).await? {
        FetchOutcome::Loaded(group) => group,
        FetchOutcome::BadIdentifier => return Ok(FetchOutcome::BadIdentifier),
    };

    let request = ListRequest::new(DETAIL_PAGE_SIZE, 0);
    let (members, roles) = futures::try_join!(
        api.fetch_members_for_group(&group.uuid, &request),
        api.fetch_roles_for_group(&group.uuid, false, &request),
    )?;
    tracing::debug!(
        "group '{}': {} members, {} roles",
        group.name,
        members.meta.count,
        roles.meta.count
    );

    Ok(FetchOutcome::Loaded(GroupDetail {
        group,
        members,
        roles,
    }))
}

/// Rename a group or change its description
pub async fn edit_group<A, N>(api: &A, notifier: &N, patch: &GroupPatch) -> MutationOutcome<Group>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    notify::run(notifier, api.update_group(patch), &messages::EDIT_GROUP).await
}

pub async fn add_members<A, N>(
    api: &A,
    notifier: &N,
    uuid: &str,
    usernames: &[String],
) -> MutationOutcome<()>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    notify::run(
        notifier,
        api.add_members_to_group(uuid, usernames),
        messages::ADD_GROUP_MEMBERS.select(usernames.len()),
    )
    .await
}

pub async fn remove_members<A, N>(
    api: &A,
    notifier: &N,
    uuid: &str,
    usernames: &[String],
) -> MutationOutcome<()>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    notify::run(
        notifier,
        api.remove_members_from_group(uuid, usernames),
        messages::REMOVE_GROUP_MEMBERS.select(usernames.len()),
    )
    .await
}

pub async fn add_roles<A, N>(
    api: &A,
    notifier: &N,
    uuid: &str,
    role_uuids: &[String],
) -> MutationOutcome<()>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    notify::run(
        notifier,
        api.add_roles_to_group(uuid, role_uuids),
        messages::ADD_GROUP_ROLES.select(role_uuids.len()),
    )
    .await
}

pub async fn remove_roles<A, N>(
    api: &A,
    notifier: &N,
    uuid: &str,
    role_uuids: &[String],
) -> MutationOutcome<()>
where
    A: RbacApi,
    N: Notifier + ?Sized,
{
    notify::run(
        notifier,
        api.remove_roles_from_group(uuid, role_uuids),
        messages::REMOVE_GROUP_ROLES.select(role_uuids.len()),
    )
    .await
}
