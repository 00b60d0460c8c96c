//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse the `TOWER_*` environment variables.
//! - Apply their values to a `ConfigLoader`.
//!
//! Invariants:
//! - Empty or whitespace-only variables are treated as unset.
//! - Returned values are trimmed.
//! - Unparseable values return `ConfigError::InvalidValue` naming the variable.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable, failing with a message naming it.
fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
///
/// Only variables that are set overwrite what the loader already holds.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("TOWER_BASE_URL") {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none("TOWER_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("TOWER_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none("TOWER_API_TOKEN") {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(skip) = parse_env::<bool>("TOWER_SKIP_VERIFY", "must be true or false")? {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = parse_env::<u64>("TOWER_TIMEOUT", "must be a number of seconds")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) =
        parse_env::<usize>("TOWER_MAX_RETRIES", "must be a non-negative integer")?
    {
        loader.set_max_retries(Some(retries));
    }
    if let Some(enabled) = parse_env::<bool>("TOWER_CACHE_ENABLED", "must be true or false")? {
        loader.set_cache_enabled(Some(enabled));
    }
    if let Some(secs) =
        parse_env::<u64>("TOWER_CACHE_TTL_SECONDS", "must be a number of seconds")?
    {
        loader.set_cache_ttl(Some(Duration::from_secs(secs)));
    }
    if let Some(ms) =
        parse_env::<u64>("TOWER_PREVIEW_DEBOUNCE_MS", "must be a number of milliseconds")?
    {
        loader.set_preview_debounce(Some(Duration::from_millis(ms)));
    }
    if let Some(depth) = parse_env::<usize>("TOWER_MAX_DEPTH", "must be a positive integer")? {
        loader.set_max_depth(Some(depth));
    }

    Ok(())
}
