//! `groups` commands.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, ListView, Session, cmd_list, settled};
use crate::cli::OutputOptions;
use crate::display::{render_group_detail, render_list};
use crate::error::{RbacError, Result};
use crate::list::{AddGroupOutcome, Groups, group_detail, load_group_detail, submit_new_group};
use crate::query::FilterValue;
use crate::remote::{FetchOutcome, GroupPatch, NewGroup, lookup_group};

pub async fn cmd_groups_ls(
    mut view: ListView,
    name: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    if let Some(name) = name {
        view.filters.push(("name".to_string(), FilterValue::text(name)));
    }
    cmd_list::<Groups>(view, output).await
}

/// Show a group with its members and roles
pub async fn cmd_group_show(uuid: &str, output: OutputOptions) -> Result<()> {
    let session = Session::load()?;

    match load_group_detail(&session.api, uuid).await? {
        FetchOutcome::Loaded(detail) => CommandOutput::new(serde_json::to_value(&detail)?)
            .with_text(render_group_detail(&detail))
            .print(output),
        FetchOutcome::BadIdentifier => CommandOutput::new(json!({
            "uuid": uuid,
            "found": false,
        }))
        .with_text(format!("No group matches '{}'.", uuid))
        .print(output),
    }
}

/// Create a group, optionally with members and roles
pub async fn cmd_group_add(group: NewGroup, output: OutputOptions) -> Result<()> {
    let session = Session::load()?;
    let mut screen = session.screen::<Groups>(None)?;
    let name = group.name.clone();

    match submit_new_group(&mut screen, group).await {
        AddGroupOutcome::Created(created) => CommandOutput::new(json!({
            "action": "group_add",
            "group": created,
            "success": true,
        }))
        .with_text(format!(
            "Created group {} {}\n\n{}",
            created.name.cyan(),
            created.uuid.dimmed(),
            render_list(screen.controller(), screen.identity())
        ))
        .print(output),
        AddGroupOutcome::NameTaken => Err(RbacError::Other(format!(
            "a group named '{}' already exists",
            name
        ))),
        AddGroupOutcome::Failed(err) => Err(err.into()),
    }
}

/// Delete groups by uuid
pub async fn cmd_group_rm(uuids: &[String], output: OutputOptions) -> Result<()> {
    let session = Session::load()?;
    let mut screen = session.screen::<Groups>(None)?;
    screen.mount().await;

    let outcome = screen.remove_groups(uuids).await?;
    settled(outcome)?;

    CommandOutput::new(json!({
        "action": "group_rm",
        "uuids": uuids,
        "success": true,
    }))
    .with_text(render_list(screen.controller(), screen.identity()))
    .print(output)
}

/// Rename a group or change its description. Unset fields keep their value.
pub async fn cmd_group_edit(
    uuid: &str,
    name: Option<String>,
    description: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::load()?;
    let current = lookup_group(&session.api, uuid)
        .await?
        .loaded()
        .ok_or_else(|| RbacError::Other(format!("no group matches '{}'", uuid)))?;

    let patch = GroupPatch {
        uuid: current.uuid.clone(),
        name: name.unwrap_or(current.name),
        description: description.or(current.description),
    };
    let updated = settled(group_detail::edit_group(&session.api, &session.notifier, &patch).await)?;

    CommandOutput::new(json!({
        "action": "group_edit",
        "group": updated,
        "success": true,
    }))
    .with_text(format!("Updated group {}", updated.name.cyan()))
    .print(output)
}

/// Which side of a group's membership a command changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Add,
    Remove,
}

fn membership_output(action: &str, uuid: &str, ids: &[String], output: OutputOptions) -> Result<()> {
    CommandOutput::new(json!({
        "action": action,
        "uuid": uuid,
        "ids": ids,
        "success": true,
    }))
    .with_text(format!("{}: {}", action.replace('_', " "), ids.join(", ")))
    .print(output)
}

async fn change_members(
    uuid: &str,
    usernames: &[String],
    change: Change,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::load()?;
    let outcome = match change {
        Change::Add => {
            group_detail::add_members(&session.api, &session.notifier, uuid, usernames).await
        }
        Change::Remove => {
            group_detail::remove_members(&session.api, &session.notifier, uuid, usernames).await
        }
    };
    settled(outcome)?;

    let action = match change {
        Change::Add => "members_add",
        Change::Remove => "members_rm",
    };
    membership_output(action, uuid, usernames, output)
}

async fn change_roles(
    uuid: &str,
    role_uuids: &[String],
    change: Change,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::load()?;
    let outcome = match change {
        Change::Add => {
            group_detail::add_roles(&session.api, &session.notifier, uuid, role_uuids).await
        }
        Change::Remove => {
            group_detail::remove_roles(&session.api, &session.notifier, uuid, role_uuids).await
        }
    };
    settled(outcome)?;

    let action = match change {
        Change::Add => "roles_add",
        Change::Remove => "roles_rm",
    };
    membership_output(action, uuid, role_uuids, output)
}

pub async fn cmd_group_members_add(
    uuid: &str,
    usernames: &[String],
    output: OutputOptions,
) -> Result<()> {
    change_members(uuid, usernames, Change::Add, output).await
}

pub async fn cmd_group_members_rm(
    uuid: &str,
    usernames: &[String],
    output: OutputOptions,
) -> Result<()> {
    change_members(uuid, usernames, Change::Remove, output).await
}

pub async fn cmd_group_roles_add(
    uuid: &str,
    role_uuids: &[String],
    output: OutputOptions,
) -> Result<()> {
    change_roles(uuid, role_uuids, Change::Add, output).await
}

pub async fn cmd_group_roles_rm(
    uuid: &str,
    role_uuids: &[String],
    output: OutputOptions,
) -> Result<()> {
    change_roles(uuid, role_uuids, Change::Remove, output).await
}
