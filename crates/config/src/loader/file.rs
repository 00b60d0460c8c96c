//! JSON config file loading.
//!
//! Responsibilities:
//! - Parse the optional config file into a `ConfigFile`.
//! - Apply its values to a `ConfigLoader`.
//!
//! Invariants:
//! - Every field is optional; unknown keys are rejected so typos surface.
//! - File values are applied before environment variables, which win.
//! - Parse errors report serde's message, which never echoes secret values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use super::builder::ConfigLoader;
use super::env::env_var_or_none;
use super::error::ConfigError;

/// On-disk configuration, e.g. `tower.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_token: Option<String>,
    pub skip_verify: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<usize>,
    pub cache_enabled: Option<bool>,
    pub cache_ttl_seconds: Option<u64>,
    pub preview_debounce_ms: Option<u64>,
    pub max_depth: Option<usize>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileRead {
            path: path.to_path_buf(),
            kind: e.kind(),
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Read the config file, if one is named, and apply it.
///
/// The path set on the loader wins over `TOWER_CONFIG_PATH`. With neither
/// set there is no file to read. A named file that is missing is an error.
pub fn apply_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let path = match loader.config_path() {
        Some(path) => path.clone(),
        None => match env_var_or_none("TOWER_CONFIG_PATH") {
            Some(path) => PathBuf::from(path),
            None => return Ok(()),
        },
    };

    debug!(path = %path.display(), "Loading config file");
    let file = ConfigFile::read(&path)?;
    apply_file_config(loader, file);
    Ok(())
}

fn apply_file_config(loader: &mut ConfigLoader, file: ConfigFile) {
    if let Some(url) = file.base_url {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = file.username {
        loader.set_username(Some(username));
    }
    if let Some(password) = file.password {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = file.api_token {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(skip) = file.skip_verify {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = file.timeout_seconds {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = file.max_retries {
        loader.set_max_retries(Some(retries));
    }
    if let Some(enabled) = file.cache_enabled {
        loader.set_cache_enabled(Some(enabled));
    }
    if let Some(ttl) = file.cache_ttl_seconds {
        loader.set_cache_ttl(Some(Duration::from_secs(ttl)));
    }
    if let Some(ms) = file.preview_debounce_ms {
        loader.set_preview_debounce(Some(Duration::from_millis(ms)));
    }
    if let Some(depth) = file.max_depth {
        loader.set_max_depth(Some(depth));
    }
}
