//! The two list screens: users and groups.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::query::{Column, FilterKey, FilterSchema, SortDirection, SortState};
use crate::remote::{Group, ListPage, ListRequest, RbacApi, RemoteResult, User};
use crate::types::{Identity, is_self_action};

/// An entity type that has a list screen
pub trait ListEntity: Send + Sync + 'static {
    type Record: Clone + fmt::Debug + Serialize + Send + Sync;

    /// Used in logs and error messages
    const NAME: &'static str;

    /// Route of the full-page list
    const PATH: &'static str;

    fn filter_schema() -> &'static FilterSchema;

    fn columns() -> &'static [Column];

    fn default_sort() -> SortState;

    /// Stable identifier used for selection membership
    fn row_id(record: &Self::Record) -> String;

    /// Human-readable label of a selected row
    fn row_label(record: &Self::Record) -> String;

    /// Cell text, one per column
    fn cells(record: &Self::Record) -> Vec<String>;

    /// Whether the row's action control is disabled for `identity`
    fn control_disabled(record: &Self::Record, identity: &Identity) -> bool;

    fn fetch<A: RbacApi>(
        api: &A,
        request: &ListRequest,
    ) -> impl Future<Output = RemoteResult<ListPage<Self::Record>>> + Send;
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

// ============================================================================
// Users
// ============================================================================

pub static USER_FILTERS: FilterSchema = FilterSchema {
    entity: "users",
    keys: &[
        FilterKey::text("username"),
        FilterKey::text("email"),
        FilterKey::multi("status"),
    ],
    defaults: &[("status", &["Active"])],
};

const USER_COLUMNS: &[Column] = &[
    Column::fixed("org_admin", "Org. Administrator"),
    Column::sortable("username", "Username"),
    Column::fixed("email", "Email"),
    Column::fixed("first_name", "First name"),
    Column::fixed("last_name", "Last name"),
    Column::fixed("status", "Status"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Users;

impl ListEntity for Users {
    type Record = User;

    const NAME: &'static str = "users";
    const PATH: &'static str = "/users";

    fn filter_schema() -> &'static FilterSchema {
        &USER_FILTERS
    }

    fn columns() -> &'static [Column] {
        USER_COLUMNS
    }

    fn default_sort() -> SortState {
        SortState {
            column_index: 1,
            direction: SortDirection::Ascending,
        }
    }

    // Usernames are unique; the numeric id is not always returned
    fn row_id(record: &User) -> String {
        record.username.clone()
    }

    fn row_label(record: &User) -> String {
        record.username.clone()
    }

    fn cells(record: &User) -> Vec<String> {
        vec![
            yes_no(record.is_org_admin),
            record.username.clone(),
            record.email.clone(),
            record.first_name.clone(),
            record.last_name.clone(),
            record.status().to_string(),
        ]
    }

    fn control_disabled(record: &User, identity: &Identity) -> bool {
        !identity.can_manage_users() || is_self_action(&identity.username, &record.username)
    }

    async fn fetch<A: RbacApi>(api: &A, request: &ListRequest) -> RemoteResult<ListPage<User>> {
        api.fetch_users(request).await
    }
}

// ============================================================================
// Groups
// ============================================================================

pub static GROUP_FILTERS: FilterSchema = FilterSchema {
    entity: "groups",
    keys: &[FilterKey::text("name")],
    defaults: &[],
};

const GROUP_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::fixed("description", "Description"),
    Column::fixed("principal_count", "Members"),
    Column::fixed("role_count", "Roles"),
    Column::sortable("modified", "Last modified"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Groups;

impl ListEntity for Groups {
    type Record = Group;

    const NAME: &'static str = "groups";
    const PATH: &'static str = "/groups";

    fn filter_schema() -> &'static FilterSchema {
        &GROUP_FILTERS
    }

    fn columns() -> &'static [Column] {
        GROUP_COLUMNS
    }

    fn default_sort() -> SortState {
        SortState {
            column_index: 0,
            direction: SortDirection::Ascending,
        }
    }

    fn row_id(record: &Group) -> String {
        record.uuid.clone()
    }

    fn row_label(record: &Group) -> String {
        record.name.clone()
    }

    fn cells(record: &Group) -> Vec<String> {
        vec![
            record.name.clone(),
            record.description.clone().unwrap_or_default(),
            record.principal_count.to_string(),
            record.role_count.to_string(),
            record.modified.clone().unwrap_or_default(),
        ]
    }

    // Platform and admin default groups are managed by the backend
    fn control_disabled(record: &Group, _identity: &Identity) -> bool {
        record.is_default()
    }

    async fn fetch<A: RbacApi>(api: &A, request: &ListRequest) -> RemoteResult<ListPage<Group>> {
        api.fetch_groups(request).await
    }
}
