//! Command implementations behind the CLI.

mod config;
mod groups;
mod users;

pub use config::{cmd_config_get, cmd_config_path, cmd_config_set, cmd_config_show};
pub use groups::{
    cmd_group_add, cmd_group_edit, cmd_group_members_add, cmd_group_members_rm, cmd_group_rm,
    cmd_group_roles_add, cmd_group_roles_rm, cmd_group_show, cmd_groups_ls,
};
pub use users::{UserFilters, cmd_users_ls, cmd_users_set_active, cmd_users_set_org_admin};

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::{list_json, render_list};
use crate::error::{RbacError, Result};
use crate::list::{ListEntity, ListMode, ListOptions, ListScreen};
use crate::notify::{ConsoleNotifier, MutationOutcome, Notifier};
use crate::query::{FilterValue, Location, SortDirection, SortState};
use crate::remote::{HttpRbacApi, RbacApi};
use crate::types::Identity;

/// JSON and text renderings of a command's result
pub struct CommandOutput {
    json: serde_json::Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: serde_json::Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Configuration plus the clients built from it
pub struct Session {
    pub config: Config,
    pub api: HttpRbacApi,
    pub notifier: ConsoleNotifier,
}

impl Session {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let api = HttpRbacApi::from_config(&config)?;
        tracing::debug!("using RBAC API at {}", api.base_url());
        Ok(Self {
            config,
            api,
            notifier: ConsoleNotifier,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.config.identity
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            mode: ListMode::Routed,
            tier: self.identity().tier(),
            pagination: self.config.pagination,
            discard_stale_responses: self.config.discard_stale_responses,
        }
    }

    /// A list screen at `href`, or at the entity's own route
    pub fn screen<E: ListEntity>(
        &self,
        href: Option<&str>,
    ) -> Result<ListScreen<'_, E, HttpRbacApi, ConsoleNotifier>> {
        let location = match href {
            Some(href) => Location::parse(href)?,
            None => Location::new(E::PATH, Default::default()),
        };
        Ok(ListScreen::new(
            self.list_options(),
            location,
            &self.api,
            &self.notifier,
            self.identity().clone(),
        ))
    }
}

/// List view requested on the command line, applied on top of the URL
#[derive(Debug, Clone, Default)]
pub struct ListView {
    /// Location to start from, e.g. a pasted `/users?status=Inactive`
    pub href: Option<String>,
    pub filters: Vec<(String, FilterValue)>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Key of the column to sort by
    pub sort: Option<String>,
    pub descending: bool,
}

/// Mount a screen and apply `view`, fetching only the final state
pub(crate) async fn open_list<E, A, N>(
    screen: &mut ListScreen<'_, E, A, N>,
    view: &ListView,
) -> Result<()>
where
    E: ListEntity,
    A: RbacApi,
    N: Notifier + ?Sized,
{
    let controller = screen.controller_mut();
    let mut pending = controller.mount();

    if !view.filters.is_empty() {
        let next = controller.edit_filters(view.filters.clone())?;
        controller.abandon(std::mem::replace(&mut pending, next).token);
    }
    if let Some(limit) = view.limit {
        let next = controller.change_limit(limit);
        controller.abandon(std::mem::replace(&mut pending, next).token);
    }
    if let Some(page) = view.page {
        let next = controller.change_page(page);
        controller.abandon(std::mem::replace(&mut pending, next).token);
    }
    if view.sort.is_some() || view.descending {
        let direction = if view.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let sort = match &view.sort {
            Some(key) => SortState::by_key(E::columns(), E::NAME, key, direction)?,
            None => SortState {
                direction,
                ..E::default_sort()
            },
        };
        let next = controller.change_sort(sort.column_index, sort.direction)?;
        controller.abandon(std::mem::replace(&mut pending, next).token);
    }

    screen.run(pending).await;
    Ok(())
}

/// Print the current state of a list screen
pub(crate) fn print_list<E, A, N>(screen: &ListScreen<'_, E, A, N>, output: OutputOptions) -> Result<()>
where
    E: ListEntity,
    A: RbacApi,
    N: Notifier + ?Sized,
{
    let controller = screen.controller();
    CommandOutput::new(list_json(controller, screen.identity()))
        .with_text(render_list(controller, screen.identity()))
        .print(output)
}

/// Run a list command for any entity
pub(crate) async fn cmd_list<E: ListEntity>(view: ListView, output: OutputOptions) -> Result<()> {
    let session = Session::load()?;
    let mut screen = session.screen::<E>(view.href.as_deref())?;
    open_list(&mut screen, &view).await?;

    if let crate::list::ListPhase::Error(err) = screen.controller().phase() {
        return Err(RbacError::Remote(err.clone()));
    }
    print_list(&screen, output)
}

/// Turn a settled mutation into the command's result
pub(crate) fn settled<T>(outcome: MutationOutcome<T>) -> Result<T> {
    match outcome {
        MutationOutcome::Fulfilled(value) => Ok(value),
        MutationOutcome::Rejected(err) => Err(RbacError::Remote(err)),
    }
}
