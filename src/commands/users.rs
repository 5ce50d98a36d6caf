//! `users` commands.

use serde_json::json;

use super::{CommandOutput, ListView, Session, cmd_list, settled};
use crate::cli::OutputOptions;
use crate::display::render_list;
use crate::error::Result;
use crate::list::Users;
use crate::query::FilterValue;
use crate::types::UserStatus;

/// Filter flags of `users ls`
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub username: Option<String>,
    pub email: Option<String>,
    pub status: Vec<UserStatus>,
    /// Drop the status constraint, including the default one
    pub all_statuses: bool,
}

impl UserFilters {
    /// Filter changes to apply on top of the URL
    pub fn patch(&self) -> Vec<(String, FilterValue)> {
        let mut patch = Vec::new();
        if let Some(username) = &self.username {
            patch.push(("username".to_string(), FilterValue::text(username)));
        }
        if let Some(email) = &self.email {
            patch.push(("email".to_string(), FilterValue::text(email)));
        }
        if self.all_statuses {
            patch.push(("status".to_string(), FilterValue::multi(Vec::<String>::new())));
        } else if !self.status.is_empty() {
            patch.push((
                "status".to_string(),
                FilterValue::multi(self.status.iter().map(|s| s.as_str())),
            ));
        }
        patch
    }
}

pub async fn cmd_users_ls(
    mut view: ListView,
    filters: UserFilters,
    output: OutputOptions,
) -> Result<()> {
    view.filters.extend(filters.patch());
    cmd_list::<Users>(view, output).await
}

/// Activate or deactivate users
pub async fn cmd_users_set_active(
    usernames: &[String],
    active: bool,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::load()?;
    let mut screen = session.screen::<Users>(None)?;
    screen.mount().await;

    let outcome = screen.set_users_active(usernames, active).await?;
    settled(outcome)?;

    CommandOutput::new(json!({
        "action": if active { "users_activate" } else { "users_deactivate" },
        "usernames": usernames,
        "success": true,
    }))
    .with_text(render_list(screen.controller(), screen.identity()))
    .print(output)
}

/// Grant or revoke organization administrator status
pub async fn cmd_users_set_org_admin(
    usernames: &[String],
    org_admin: bool,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::load()?;
    let mut screen = session.screen::<Users>(None)?;
    screen.mount().await;

    let outcome = screen.set_users_org_admin(usernames, org_admin).await?;
    settled(outcome)?;

    CommandOutput::new(json!({
        "action": if org_admin { "users_promote" } else { "users_demote" },
        "usernames": usernames,
        "success": true,
    }))
    .with_text(render_list(screen.controller(), screen.identity()))
    .print(output)
}
