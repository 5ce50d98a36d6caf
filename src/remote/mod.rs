//! Remote access to the RBAC backend.
//!
//! [`RbacApi`] is the seam between the list controllers and the network.
//! [`HttpRbacApi`] talks to the real REST API; tests substitute an
//! in-memory implementation.

pub mod client;
pub mod error;
pub mod models;

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::FilterSet;

pub use client::HttpRbacApi;
pub use error::{ErrorDetail, RemoteError};
pub use models::{Group, GroupPatch, NewGroup, Principal, Role, User, UserPatch};

/// Result of a remote call
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Everything a list fetch sends to a collection endpoint.
///
/// Rebuilt from controller state for every fetch, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub filters: FilterSet,
    pub limit: u32,
    pub offset: u32,
    pub order_by: Option<String>,
    /// The list is embedded in a dialog rather than routed
    pub in_modal: bool,
}

impl ListRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            filters: FilterSet::new(),
            limit,
            offset,
            order_by: None,
            in_modal: false,
        }
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Query parameters for the collection endpoint. Multi-select values
    /// are joined with commas.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by".to_string(), order_by.clone()));
        }
        for (key, value) in self.filters.iter() {
            pairs.push((key.to_string(), value.values().join(",")));
        }
        pairs
    }
}

/// The window a list response covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// One page of a collection: `{"data": [...], "meta": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: ListMeta,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, meta: ListMeta) -> Self {
        Self { items, meta }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// A fetch that either loaded or was rejected for a malformed identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    BadIdentifier,
}

impl<T> FetchOutcome<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            FetchOutcome::Loaded(value) => Some(value),
            FetchOutcome::BadIdentifier => None,
        }
    }
}

/// Turn a malformed-identifier rejection into an in-band result.
/// Every other error is passed through.
pub fn downgrade_bad_identifier<T>(result: RemoteResult<T>) -> RemoteResult<FetchOutcome<T>> {
    match result {
        Ok(value) => Ok(FetchOutcome::Loaded(value)),
        Err(err) if err.is_bad_identifier() => {
            tracing::warn!("downgrading bad identifier error: {err}");
            Ok(FetchOutcome::BadIdentifier)
        }
        Err(err) => Err(err),
    }
}

/// Load one group by a user-supplied identifier, e.g. from a deep link.
///
/// A string that is not a UUID never reaches the network.
pub async fn lookup_group<A: RbacApi>(api: &A, raw: &str) -> RemoteResult<FetchOutcome<Group>> {
    let Ok(uuid) = Uuid::parse_str(raw.trim()) else {
        tracing::debug!("'{raw}' is not a group uuid");
        return Ok(FetchOutcome::BadIdentifier);
    };
    downgrade_bad_identifier(api.fetch_group(&uuid).await)
}

/// Operations of the RBAC backend used by the console
pub trait RbacApi: Send + Sync {
    fn fetch_users(
        &self,
        request: &ListRequest,
    ) -> impl Future<Output = RemoteResult<ListPage<User>>> + Send;

    fn fetch_groups(
        &self,
        request: &ListRequest,
    ) -> impl Future<Output = RemoteResult<ListPage<Group>>> + Send;

    /// The group every organization administrator belongs to
    fn fetch_admin_group(
        &self,
        name_filter: Option<&str>,
    ) -> impl Future<Output = RemoteResult<Option<Group>>> + Send;

    /// The group every user belongs to by default
    fn fetch_system_group(
        &self,
        name_filter: Option<&str>,
    ) -> impl Future<Output = RemoteResult<Option<Group>>> + Send;

    fn fetch_group(&self, uuid: &Uuid) -> impl Future<Output = RemoteResult<Group>> + Send;

    fn add_group(&self, group: &NewGroup) -> impl Future<Output = RemoteResult<Group>> + Send;

    fn update_group(&self, patch: &GroupPatch)
    -> impl Future<Output = RemoteResult<Group>> + Send;

    fn remove_groups(&self, uuids: &[String]) -> impl Future<Output = RemoteResult<()>> + Send;

    fn update_users(&self, patches: &[UserPatch])
    -> impl Future<Output = RemoteResult<()>> + Send;

    fn fetch_members_for_group(
        &self,
        uuid: &str,
        request: &ListRequest,
    ) -> impl Future<Output = RemoteResult<ListPage<Principal>>> + Send;

    fn add_members_to_group(
        &self,
        uuid: &str,
        usernames: &[String],
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    fn remove_members_from_group(
        &self,
        uuid: &str,
        usernames: &[String],
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Roles attached to the group, or with `exclude` the roles that are not
    fn fetch_roles_for_group(
        &self,
        uuid: &str,
        exclude: bool,
        request: &ListRequest,
    ) -> impl Future<Output = RemoteResult<ListPage<Role>>> + Send;

    fn add_roles_to_group(
        &self,
        uuid: &str,
        role_uuids: &[String],
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    fn remove_roles_from_group(
        &self,
        uuid: &str,
        role_uuids: &[String],
    ) -> impl Future<Output = RemoteResult<()>> + Send;
}
