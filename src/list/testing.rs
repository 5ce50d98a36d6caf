//! In-memory RBAC backend for unit tests.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::remote::{
    Group, GroupPatch, ListMeta, ListPage, ListRequest, NewGroup, Principal, RbacApi,
    RemoteError, RemoteResult, Role, User, UserPatch,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    groups: Vec<Group>,
    members: HashMap<String, Vec<Principal>>,
    roles: HashMap<String, Vec<Role>>,
    all_roles: Vec<Role>,
    user_requests: Vec<ListRequest>,
    group_requests: Vec<ListRequest>,
    user_patches: Vec<UserPatch>,
    mutations: usize,
    fail_next_mutation: Option<RemoteError>,
    fail_next_fetch: Option<RemoteError>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

fn paginate<T: Clone>(items: Vec<T>, request: &ListRequest) -> ListPage<T> {
    let count = items.len() as u64;
    let page = items
        .into_iter()
        .skip(request.offset as usize)
        .take(request.limit as usize)
        .collect();
    ListPage::new(
        page,
        ListMeta {
            count,
            limit: request.limit,
            offset: request.offset,
        },
    )
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.state.lock().users.push(user);
    }

    pub fn insert_group(&self, group: Group) {
        self.state.lock().groups.push(group);
    }

    pub fn add_role(&self, role: Role) {
        self.state.lock().all_roles.push(role);
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.state
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn group_named(&self, name: &str) -> Option<Group> {
        self.state
            .lock()
            .groups
            .iter()
            .find(|g| g.name == name)
            .cloned()
    }

    pub fn members(&self, uuid: &str) -> Vec<String> {
        self.state
            .lock()
            .members
            .get(uuid)
            .map(|m| m.iter().map(|p| p.username.clone()).collect())
            .unwrap_or_default()
    }

    pub fn user_requests(&self) -> Vec<ListRequest> {
        self.state.lock().user_requests.clone()
    }

    pub fn group_requests(&self) -> Vec<ListRequest> {
        self.state.lock().group_requests.clone()
    }

    /// Every patch sent through `update_users`, in order
    pub fn user_patches(&self) -> Vec<UserPatch> {
        self.state.lock().user_patches.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.lock().mutations
    }

    pub fn fail_next_mutation(&self, err: RemoteError) {
        self.state.lock().fail_next_mutation = Some(err);
    }

    pub fn fail_next_fetch(&self, err: RemoteError) {
        self.state.lock().fail_next_fetch = Some(err);
    }

    fn begin_mutation(&self) -> RemoteResult<parking_lot::MutexGuard<'_, State>> {
        let mut state = self.state.lock();
        state.mutations += 1;
        match state.fail_next_mutation.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

impl RbacApi for FakeApi {
    async fn fetch_users(&self, request: &ListRequest) -> RemoteResult<ListPage<User>> {
        let mut state = self.state.lock();
        state.user_requests.push(request.clone());
        if let Some(err) = state.fail_next_fetch.take() {
            return Err(err);
        }

        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|u| {
                let f = &request.filters;
                f.text("username")
                    .is_none_or(|name| contains_ci(&u.username, name))
                    && f.text("email").is_none_or(|email| contains_ci(&u.email, email))
                    && f.get("status").is_none_or(|status| {
                        status.values().contains(&u.status().as_str())
                    })
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        if request.order_by.as_deref() == Some("-username") {
            users.reverse();
        }
        Ok(paginate(users, request))
    }

    async fn fetch_groups(&self, request: &ListRequest) -> RemoteResult<ListPage<Group>> {
        let mut state = self.state.lock();
        state.group_requests.push(request.clone());
        if let Some(err) = state.fail_next_fetch.take() {
            return Err(err);
        }

        let mut groups: Vec<Group> = state
            .groups
            .iter()
            .filter(|g| {
                request
                    .filters
                    .text("name")
                    .is_none_or(|name| contains_ci(&g.name, name))
            })
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(groups, request))
    }

    async fn fetch_admin_group(&self, name_filter: Option<&str>) -> RemoteResult<Option<Group>> {
        let state = self.state.lock();
        Ok(state
            .groups
            .iter()
            .find(|g| g.admin_default && name_filter.is_none_or(|n| contains_ci(&g.name, n)))
            .cloned())
    }

    async fn fetch_system_group(&self, name_filter: Option<&str>) -> RemoteResult<Option<Group>> {
        let state = self.state.lock();
        Ok(state
            .groups
            .iter()
            .find(|g| g.platform_default && name_filter.is_none_or(|n| contains_ci(&g.name, n)))
            .cloned())
    }

    async fn fetch_group(&self, uuid: &Uuid) -> RemoteResult<Group> {
        let state = self.state.lock();
        state
            .groups
            .iter()
            .find(|g| g.uuid == uuid.to_string())
            .cloned()
            .ok_or_else(|| RemoteError::new(Some(404), "Not found."))
    }

    async fn add_group(&self, group: &NewGroup) -> RemoteResult<Group> {
        let mut state = self.begin_mutation()?;
        if state.groups.iter().any(|g| g.name == group.name) {
            return Err(RemoteError::with_detail(
                400,
                "name",
                "A group with this name already exists.",
            ));
        }

        let created = Group {
            uuid: Uuid::new_v4().to_string(),
            name: group.name.clone(),
            description: group.description.clone(),
            principal_count: group.user_list.len() as u64,
            role_count: group.roles_list.len() as u64,
            ..Default::default()
        };
        let members = group
            .user_list
            .iter()
            .map(|username| Principal {
                username: username.clone(),
                ..Default::default()
            })
            .collect();
        state.members.insert(created.uuid.clone(), members);
        state.groups.push(created.clone());
        Ok(created)
    }

    async fn update_group(&self, patch: &GroupPatch) -> RemoteResult<Group> {
        let mut state = self.begin_mutation()?;
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.uuid == patch.uuid)
            .ok_or_else(|| RemoteError::new(Some(404), "Not found."))?;
        group.name = patch.name.clone();
        group.description = patch.description.clone();
        Ok(group.clone())
    }

    async fn remove_groups(&self, uuids: &[String]) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        state.groups.retain(|g| !uuids.contains(&g.uuid));
        Ok(())
    }

    async fn update_users(&self, patches: &[UserPatch]) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        state.user_patches.extend_from_slice(patches);
        for patch in patches {
            if let Some(user) = state
                .users
                .iter_mut()
                .find(|u| u.username == patch.username)
            {
                if let Some(active) = patch.is_active {
                    user.is_active = active;
                }
                if let Some(org_admin) = patch.is_org_admin {
                    user.is_org_admin = org_admin;
                }
            }
        }
        Ok(())
    }

    async fn fetch_members_for_group(
        &self,
        uuid: &str,
        request: &ListRequest,
    ) -> RemoteResult<ListPage<Principal>> {
        let state = self.state.lock();
        let members = state.members.get(uuid).cloned().unwrap_or_default();
        Ok(paginate(members, request))
    }

    async fn add_members_to_group(&self, uuid: &str, usernames: &[String]) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        let members = state.members.entry(uuid.to_string()).or_default();
        for username in usernames {
            members.push(Principal {
                username: username.clone(),
                ..Default::default()
            });
        }
        Ok(())
    }

    async fn remove_members_from_group(
        &self,
        uuid: &str,
        usernames: &[String],
    ) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        if let Some(members) = state.members.get_mut(uuid) {
            members.retain(|p| !usernames.contains(&p.username));
        }
        Ok(())
    }

    async fn fetch_roles_for_group(
        &self,
        uuid: &str,
        exclude: bool,
        request: &ListRequest,
    ) -> RemoteResult<ListPage<Role>> {
        let state = self.state.lock();
        let attached = state.roles.get(uuid).cloned().unwrap_or_default();
        let roles = if exclude {
            state
                .all_roles
                .iter()
                .filter(|r| !attached.iter().any(|a| a.uuid == r.uuid))
                .cloned()
                .collect()
        } else {
            attached
        };
        Ok(paginate(roles, request))
    }

    async fn add_roles_to_group(&self, uuid: &str, role_uuids: &[String]) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        let found: Vec<Role> = state
            .all_roles
            .iter()
            .filter(|r| role_uuids.contains(&r.uuid))
            .cloned()
            .collect();
        state.roles.entry(uuid.to_string()).or_default().extend(found);
        Ok(())
    }

    async fn remove_roles_from_group(&self, uuid: &str, role_uuids: &[String]) -> RemoteResult<()> {
        let mut state = self.begin_mutation()?;
        if let Some(roles) = state.roles.get_mut(uuid) {
            roles.retain(|r| !role_uuids.contains(&r.uuid));
        }
        Ok(())
    }
}
