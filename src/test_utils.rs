//! Helpers for unit tests that touch process environment
//!
//! Integration tests under tests/ are separate binaries and keep their own
//! fixtures in tests/common/mod.rs.

use once_cell::sync::Lazy;
use std::env;

/// Serializes tests that read or write `STARLINK_*` variables
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Restores every touched variable on drop, panics included
#[derive(Default)]
pub struct EnvVarGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn remember(&mut self, key: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        // SAFETY: callers hold ENV_MUTEX
        unsafe { env::set_var(key, value) }
    }

    pub fn remove(&mut self, key: &str) {
        self.remember(key);
        // SAFETY: callers hold ENV_MUTEX
        unsafe { env::remove_var(key) }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
