//! REST client for the RBAC API.
//!
//! The bearer token is held in a [`SecretString`] and only exposed while a
//! request header is built. Neither `Debug` nor the request logging below
//! ever prints it.

use std::fmt;
use std::time::Duration;

use futures::future::try_join_all;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{RbacError, Result};

use super::{
    Group, GroupPatch, ListMeta, ListPage, ListRequest, NewGroup, Principal, RbacApi,
    RemoteError, RemoteResult, Role, User, UserPatch,
};

/// RBAC backend over HTTP
#[derive(Clone)]
pub struct HttpRbacApi {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl fmt::Debug for HttpRbacApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRbacApi")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpRbacApi {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.api_token(),
            config.remote_timeout(),
        )
    }

    /// Create a client. A zero `timeout` disables the request timeout.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| RbacError::Config(format!("invalid base_url '{base_url}': {e}")))?;

        let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: token.map(SecretString::from),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{method} {path}");
        let builder = self.client.request(method, self.endpoint(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = RemoteError::from_response(status.as_u16(), &body);
        tracing::warn!("RBAC API rejected request: {err}");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> RemoteResult<()> {
        self.send(builder).await?;
        Ok(())
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> RemoteResult<ListPage<T>> {
        self.send_json(self.request(Method::GET, path).query(query))
            .await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RemoteResult<()> {
        self.send_empty(self.request(Method::POST, path).json(body))
            .await
    }

    /// Look up a default group (admin or platform), optionally narrowed by name
    async fn fetch_default_group(
        &self,
        flag: &str,
        name_filter: Option<&str>,
    ) -> RemoteResult<Option<Group>> {
        let mut query = vec![
            ("limit".to_string(), "1".to_string()),
            (flag.to_string(), "true".to_string()),
        ];
        if let Some(name) = name_filter.filter(|n| !n.is_empty()) {
            query.push(("name".to_string(), name.to_string()));
            query.push(("name_match".to_string(), "partial".to_string()));
        }
        let page: ListPage<Group> = self.get_page("groups/", &query).await?;
        Ok(page.items.into_iter().next())
    }
}

impl RbacApi for HttpRbacApi {
    async fn fetch_users(&self, request: &ListRequest) -> RemoteResult<ListPage<User>> {
        self.get_page("principals/", &request.query_pairs()).await
    }

    async fn fetch_groups(&self, request: &ListRequest) -> RemoteResult<ListPage<Group>> {
        let mut query = request.query_pairs();
        if request.filters.contains_key("name") {
            query.push(("name_match".to_string(), "partial".to_string()));
        }
        self.get_page("groups/", &query).await
    }

    async fn fetch_admin_group(&self, name_filter: Option<&str>) -> RemoteResult<Option<Group>> {
        self.fetch_default_group("admin_default", name_filter).await
    }

    async fn fetch_system_group(&self, name_filter: Option<&str>) -> RemoteResult<Option<Group>> {
        self.fetch_default_group("platform_default", name_filter)
            .await
    }

    async fn fetch_group(&self, uuid: &Uuid) -> RemoteResult<Group> {
        self.send_json(self.request(Method::GET, &format!("groups/{uuid}/")))
            .await
    }

    async fn add_group(&self, group: &NewGroup) -> RemoteResult<Group> {
        let created: Group = self
            .send_json(self.request(Method::POST, "groups/").json(&json!({
                "name": group.name,
                "description": group.description,
            })))
            .await?;

        if !group.user_list.is_empty() {
            self.add_members_to_group(&created.uuid, &group.user_list)
                .await?;
        }
        if !group.roles_list.is_empty() {
            self.add_roles_to_group(&created.uuid, &group.roles_list)
                .await?;
        }
        Ok(created)
    }

    async fn update_group(&self, patch: &GroupPatch) -> RemoteResult<Group> {
        self.send_json(
            self.request(Method::PUT, &format!("groups/{}/", patch.uuid))
                .json(patch),
        )
        .await
    }

    async fn remove_groups(&self, uuids: &[String]) -> RemoteResult<()> {
        try_join_all(uuids.iter().map(|uuid| {
            self.send_empty(self.request(Method::DELETE, &format!("groups/{uuid}/")))
        }))
        .await?;
        Ok(())
    }

    async fn update_users(&self, patches: &[UserPatch]) -> RemoteResult<()> {
        self.send_empty(
            self.request(Method::PATCH, "principals/")
                .json(&json!({ "users": patches })),
        )
        .await
    }

    async fn fetch_members_for_group(
        &self,
        uuid: &str,
        request: &ListRequest,
    ) -> RemoteResult<ListPage<Principal>> {
        self.get_page(&format!("groups/{uuid}/principals/"), &request.query_pairs())
            .await
    }

    async fn add_members_to_group(&self, uuid: &str, usernames: &[String]) -> RemoteResult<()> {
        let principals: Vec<_> = usernames
            .iter()
            .map(|username| json!({ "username": username }))
            .collect();
        self.post(
            &format!("groups/{uuid}/principals/"),
            &json!({ "principals": principals }),
        )
        .await
    }

    async fn remove_members_from_group(
        &self,
        uuid: &str,
        usernames: &[String],
    ) -> RemoteResult<()> {
        self.send_empty(
            self.request(Method::DELETE, &format!("groups/{uuid}/principals/"))
                .query(&[("usernames", usernames.join(","))]),
        )
        .await
    }

    async fn fetch_roles_for_group(
        &self,
        uuid: &str,
        exclude: bool,
        request: &ListRequest,
    ) -> RemoteResult<ListPage<Role>> {
        let mut query = request.query_pairs();
        query.push(("exclude".to_string(), exclude.to_string()));
        let page: ListPage<Role> = self
            .get_page(&format!("groups/{uuid}/roles/"), &query)
            .await?;

        // Older servers omit meta on this endpoint
        if page.meta == ListMeta::default() {
            let count = page.items.len() as u64;
            return Ok(ListPage::new(
                page.items,
                ListMeta {
                    count,
                    limit: request.limit,
                    offset: request.offset,
                },
            ));
        }
        Ok(page)
    }

    async fn add_roles_to_group(&self, uuid: &str, role_uuids: &[String]) -> RemoteResult<()> {
        self.post(
            &format!("groups/{uuid}/roles/"),
            &json!({ "roles": role_uuids }),
        )
        .await
    }

    async fn remove_roles_from_group(&self, uuid: &str, role_uuids: &[String]) -> RemoteResult<()> {
        self.send_empty(
            self.request(Method::DELETE, &format!("groups/{uuid}/roles/"))
                .query(&[("roles", role_uuids.join(","))]),
        )
        .await
    }
}
