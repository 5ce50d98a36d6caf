//! Records exchanged with the RBAC backend.

use serde::{Deserialize, Serialize};

use crate::types::UserStatus;

/// A user account as returned by the principals endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_org_admin: bool,
}

impl User {
    pub fn status(&self) -> UserStatus {
        UserStatus::from_active(self.is_active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub principal_count: u64,
    #[serde(default)]
    pub role_count: u64,
    #[serde(default)]
    pub platform_default: bool,
    #[serde(default)]
    pub admin_default: bool,
    #[serde(default)]
    pub system: bool,
    /// ISO 8601 timestamp of the last modification
    #[serde(default)]
    pub modified: Option<String>,
}

impl Group {
    /// Default groups are managed by the platform and cannot be removed
    pub fn is_default(&self) -> bool {
        self.platform_default || self.admin_default
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A member of a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Partial user record: only the changed fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_org_admin: Option<bool>,
}

impl UserPatch {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            ..Default::default()
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn org_admin(mut self, is_org_admin: bool) -> Self {
        self.is_org_admin = Some(is_org_admin);
        self
    }
}

/// Payload of the create-group request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Usernames to add once the group exists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_list: Vec<String>,
    /// Role uuids to attach once the group exists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles_list: Vec<String>,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A draft nobody has typed into yet
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self
                .description
                .as_deref()
                .is_none_or(|d| d.trim().is_empty())
            && self.user_list.is_empty()
            && self.roles_list.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPatch {
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
