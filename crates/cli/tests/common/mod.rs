//! Shared test utilities for tower-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write sample documents into a temp directory.
//!
//! Invariants / Assumptions:
//! - `TOWER_API_TOKEN` is set to "test-token" unless overridden.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `tower-cli` command for integration testing.
///
/// - `DOTENV_DISABLED=1` keeps a local `.env` out of the test.
/// - `TOWER_API_TOKEN` satisfies config validation for remote commands.
/// - Other `TOWER_*` variables are cleared so the host cannot leak in.
pub fn tower_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tower-cli");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("TOWER_API_TOKEN", "test-token");

    cmd.env_remove("TOWER_BASE_URL")
        .env_remove("TOWER_USERNAME")
        .env_remove("TOWER_PASSWORD")
        .env_remove("TOWER_CONFIG_PATH")
        .env_remove("TOWER_MAX_DEPTH")
        .env_remove("TOWER_MAX_RETRIES")
        .env_remove("RUST_LOG");

    cmd
}

/// Hermetic command pointed at `base_url` with retries disabled.
pub fn tower_cmd_with_base_url(base_url: &str) -> Command {
    let mut cmd = tower_cmd();
    cmd.env("TOWER_BASE_URL", base_url);
    cmd.env("TOWER_MAX_RETRIES", "0");
    cmd
}

/// Write `value` as `name` inside `dir`.
pub fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

pub fn source_sample() -> serde_json::Value {
    serde_json::json!({
        "title": "  Oak desk ",
        "price": "19.99",
        "variants": [{"sku": "OAK-1", "weight": 12}]
    })
}

pub fn target_sample() -> serde_json::Value {
    serde_json::json!({
        "name": "",
        "price": 0.0,
        "sku": "",
        "description": ""
    })
}
