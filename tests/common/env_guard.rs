//! RAII guard for environment variables in tests.
//!
//! Tests that point the config at a temporary file (`RBAC_CONSOLE_CONFIG`)
//! or inject a token (`RBAC_API_TOKEN`) mutate process-global state and must
//! restore it even if the test panics. The guard snapshots the variable in
//! `new()` and restores it in `Drop`.
//!
//! Tests using the guard should still be marked `#[serial]`: the environment
//! is process-global and cannot be isolated between concurrent tests.

use std::env;
use std::ffi::{OsStr, OsString};

/// RAII guard that restores an environment variable on drop.
///
/// # Example
///
/// ```ignore
/// #[test]
/// #[serial]
/// fn test_something() {
///     let _guard = unsafe { EnvGuard::set("RBAC_CONSOLE_CONFIG", "/tmp/config.yaml") };
///     // RBAC_CONSOLE_CONFIG is restored when _guard goes out of scope
/// }
/// ```
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// Snapshot the current value of `key`
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            original: env::var_os(key),
        }
    }

    /// Snapshot `key`, then set it to `value`.
    ///
    /// # Safety
    /// Calls `std::env::set_var`, which is unsafe in Rust 2024 edition due to
    /// potential data races in multi-threaded programs. Mark tests `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<OsStr>) -> Self {
        let guard = Self::new(key);
        unsafe { env::set_var(key, value) };
        guard
    }

    /// Snapshot `key`, then remove it.
    ///
    /// # Safety
    /// Calls `std::env::remove_var`; same constraints as [`EnvGuard::set`].
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self::new(key);
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: runs during test teardown; tests using EnvGuard are #[serial].
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
