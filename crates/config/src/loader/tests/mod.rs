//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test builder overrides, environment handling and precedence.
//! - Test config file loading.
//! - Test value validation and dotenv gating.
//!
//! Invariants:
//! - Tests that touch process-global state (env, cwd) hold `env_lock()` and
//!   run under `serial_test`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod env_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
