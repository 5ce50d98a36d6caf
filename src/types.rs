//! Shared domain types: the acting identity, privilege tiers, and user status.

use serde::{Deserialize, Serialize};

/// Valid values for the user `status` filter
pub const VALID_USER_STATUSES: &[&str] = UserStatus::ALL_STRINGS;

/// The identity performing actions in the console
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub username: String,
    /// Organization administrator
    #[serde(default)]
    pub org_admin: bool,
    /// Holds the "User Access administrator" role
    #[serde(default)]
    pub user_access_admin: bool,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn org_admin(mut self) -> Self {
        self.org_admin = true;
        self
    }

    pub fn user_access_admin(mut self) -> Self {
        self.user_access_admin = true;
        self
    }

    /// Pagination tier for this identity. Only organization administrators
    /// get the elevated page size.
    pub fn tier(&self) -> PrivilegeTier {
        if self.org_admin {
            PrivilegeTier::Elevated
        } else {
            PrivilegeTier::Standard
        }
    }

    /// Whether this identity may change other users' activation or admin status
    pub fn can_manage_users(&self) -> bool {
        self.org_admin || self.user_access_admin
    }
}

/// Which built-in pagination default applies to the acting identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivilegeTier {
    #[default]
    Standard,
    Elevated,
}

/// True when an administrative action would target the acting identity itself.
///
/// Evaluated twice: once to render the row control disabled and once as a
/// guard before a mutation is dispatched.
pub fn is_self_action(acting: &str, target: &str) -> bool {
    !acting.is_empty() && acting.eq_ignore_ascii_case(target)
}

/// Activation status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn from_active(is_active: bool) -> Self {
        if is_active {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        }
    }
}

enum_str!(UserStatus, "status", {
    Active => "Active",
    Inactive => "Inactive",
});
