//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or the file named by `RBAC_CONSOLE_CONFIG`) and includes:
//! - The RBAC API base URL and bearer token
//! - The acting identity and its privileges
//! - Page sizes for the two privilege tiers

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{RbacError, Result};
use crate::query::PaginationDefaults;
use crate::types::Identity;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "RBAC_CONSOLE_CONFIG";
/// Overrides `auth.token`
pub const TOKEN_ENV: &str = "RBAC_API_TOKEN";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/rbac/v1";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "base_url",
    "auth.token",
    "identity.username",
    "identity.org_admin",
    "identity.user_access_admin",
    "pagination.standard_limit",
    "pagination.admin_limit",
    "remote_timeout",
    "discard_stale_responses",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the RBAC REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication tokens
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    /// The identity acting in the console
    #[serde(default)]
    pub identity: Identity,

    #[serde(default)]
    pub pagination: PaginationDefaults,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Drop list responses that resolve after a newer fetch was issued
    #[serde(default)]
    pub discard_stale_responses: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_remote_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthConfig::default(),
            identity: Identity::default(),
            pagination: PaginationDefaults::default(),
            remote_timeout: default_remote_timeout(),
            discard_stale_responses: false,
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        ProjectDirs::from("com", "redhat", "rbac-console")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| RbacError::Config("could not determine a config directory".to_string()))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            RbacError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {e}", path.display()),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RbacError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            RbacError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file may hold an API token: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.pagination.standard_limit == 0 || self.pagination.admin_limit == 0 {
            return Err(RbacError::Config(
                "pagination limits must be positive".to_string(),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            RbacError::Config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        Ok(())
    }

    /// Get the API token from the environment or the config file
    pub fn api_token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }

        self.auth.token.clone()
    }

    /// Get the remote operation timeout duration
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }

    /// Set a value by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                url::Url::parse(value).map_err(|e| {
                    RbacError::Config(format!("invalid base_url '{value}': {e}"))
                })?;
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "auth.token" => {
                self.auth.token = (!value.is_empty()).then(|| value.to_string());
            }
            "identity.username" => self.identity.username = value.to_string(),
            "identity.org_admin" => self.identity.org_admin = parse_bool(key, value)?,
            "identity.user_access_admin" => {
                self.identity.user_access_admin = parse_bool(key, value)?
            }
            "pagination.standard_limit" => {
                self.pagination.standard_limit = parse_limit(key, value)?
            }
            "pagination.admin_limit" => self.pagination.admin_limit = parse_limit(key, value)?,
            "remote_timeout" => {
                self.remote_timeout = value.parse().map_err(|_| {
                    RbacError::Config(format!("{key} must be a number of seconds"))
                })?
            }
            "discard_stale_responses" => self.discard_stale_responses = parse_bool(key, value)?,
            _ => {
                return Err(RbacError::Config(format!(
                    "unknown config key '{}'. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs for display, with the token masked
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        let token = match self.api_token() {
            Some(token) => mask_token(&token),
            None => "not set".to_string(),
        };
        vec![
            ("base_url", self.base_url.clone()),
            ("auth.token", token),
            ("identity.username", self.identity.username.clone()),
            ("identity.org_admin", self.identity.org_admin.to_string()),
            (
                "identity.user_access_admin",
                self.identity.user_access_admin.to_string(),
            ),
            (
                "pagination.standard_limit",
                self.pagination.standard_limit.to_string(),
            ),
            (
                "pagination.admin_limit",
                self.pagination.admin_limit.to_string(),
            ),
            ("remote_timeout", self.remote_timeout.to_string()),
            (
                "discard_stale_responses",
                self.discard_stale_responses.to_string(),
            ),
        ]
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(RbacError::Config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}

fn parse_limit(key: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(RbacError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

/// Show the first and last two characters of a secret
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.auth.token.is_none());
        assert_eq!(config.pagination.standard_limit, 20);
        assert_eq!(config.pagination.admin_limit, 50);
        assert_eq!(config.remote_timeout(), Duration::from_secs(30));
        assert!(!config.discard_stale_responses);
    }

    #[test]
    fn test_config_partial_yaml_uses_defaults() {
        let yaml = r#"
identity:
  username: jdoe
  org_admin: true
pagination:
  admin_limit: 100
"#;
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.identity.username, "jdoe");
        assert!(config.identity.org_admin);
        assert!(!config.identity.user_access_admin);
        assert_eq!(config.pagination.standard_limit, 20);
        assert_eq!(config.pagination.admin_limit, 100);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.set("auth.token", "secret-token").unwrap();
        config.set("identity.username", "jdoe").unwrap();
        config.set("discard_stale_responses", "yes").unwrap();

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.auth.token.as_deref(), Some("secret-token"));
        assert_eq!(parsed.identity.username, "jdoe");
        assert!(parsed.discard_stale_responses);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.set("auth.token", "secret-token").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("pagination.standard_limit", "0").is_err());
        assert!(config.set("pagination.admin_limit", "-3").is_err());
        assert!(config.set("identity.org_admin", "maybe").is_err());
        assert!(config.set("base_url", "not a url").is_err());
        assert!(matches!(
            config.set("colour", "blue"),
            Err(RbacError::Config(_))
        ));
    }

    #[test]
    fn test_set_trims_trailing_slash() {
        let mut config = Config::default();
        config
            .set("base_url", "https://console.example.com/api/rbac/v1/")
            .unwrap();
        assert_eq!(config.base_url, "https://console.example.com/api/rbac/v1");
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config: Config = serde_yaml_ng::from_str("pagination:\n  standard_limit: 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefgh"), "ab****gh");
        assert_eq!(mask_token("abc"), "***");
    }
}
