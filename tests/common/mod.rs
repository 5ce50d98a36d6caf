//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod env_guard;
pub mod mock_backend;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs rbac-console against an isolated config file
pub struct ConsoleTest {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl ConsoleTest {
    /// No config file yet; the binary falls back to defaults
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.yaml");
        ConsoleTest {
            temp_dir,
            config_path,
        }
    }

    /// A config pointing at `base_url`, acting as an organization administrator
    pub fn with_backend(base_url: &str) -> Self {
        let test = Self::new();
        test.write_config(&format!(
            r#"base_url: {base_url}
auth:
  token: test-token-1234
identity:
  username: admin
  org_admin: true
pagination:
  standard_limit: 20
  admin_limit: 50
remote_timeout: 5
"#
        ));
        test
    }

    pub fn write_config(&self, yaml: &str) {
        fs::write(&self.config_path, yaml).expect("Failed to write config");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(&self.config_path).expect("Failed to read config")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rbac-console"));
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("RBAC_CONSOLE_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RBAC_API_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute rbac-console")
    }

    /// Run off the async runtime so a mock backend on the same runtime keeps serving
    pub async fn run_async(&self, args: &[&str]) -> Output {
        let mut cmd = self.command(args);
        tokio::task::spawn_blocking(move || cmd.output())
            .await
            .expect("rbac-console task panicked")
            .expect("Failed to execute rbac-console")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        check_success(args, self.run(args))
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        check_failure(args, self.run(args))
    }

    pub async fn run_success_async(&self, args: &[&str]) -> String {
        check_success(args, self.run_async(args).await)
    }

    pub async fn run_failure_async(&self, args: &[&str]) -> String {
        check_failure(args, self.run_async(args).await)
    }
}

fn check_success(args: &[&str], output: Output) -> String {
    if !output.status.success() {
        panic!(
            "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn check_failure(args: &[&str], output: Output) -> String {
    assert!(
        !output.status.success(),
        "Expected command {:?} to fail, but it succeeded\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Users named user00.. for `range`, every third one inactive
pub fn user_rows(range: std::ops::Range<usize>) -> serde_json::Value {
    range
        .map(|i| {
            serde_json::json!({
                "id": i,
                "username": format!("user{i:02}"),
                "email": format!("user{i:02}@example.com"),
                "first_name": "Test",
                "last_name": format!("User {i}"),
                "is_active": i % 3 != 0,
                "is_org_admin": false,
            })
        })
        .collect()
}

pub fn group_row(uuid: &str, name: &str, platform_default: bool) -> serde_json::Value {
    serde_json::json!({
        "uuid": uuid,
        "name": name,
        "description": format!("{name} group"),
        "principal_count": 3,
        "role_count": 1,
        "platform_default": platform_default,
        "admin_default": false,
        "system": platform_default,
        "modified": "2024-05-01T10:00:00Z",
    })
}
