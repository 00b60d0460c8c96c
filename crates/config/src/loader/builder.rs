//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Collect values from the config file, the environment and direct overrides.
//! - Validate them and build the final `Config`.
//! - Build the mapping-editor settings alone for offline use.
//!
//! Does NOT handle:
//! - Environment variable parsing (delegated to env.rs).
//! - Config file parsing (delegated to file.rs).
//!
//! Invariants / Assumptions:
//! - Later sources overwrite earlier ones; callers apply file, then env, then overrides.
//! - API token auth takes precedence over username/password.
//! - `load_dotenv()` checks `DOTENV_DISABLED` before touching the filesystem.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::apply_file;
use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_RETRIES, DEFAULT_PREVIEW_DEBOUNCE_MS,
    DEFAULT_TIMEOUT_SECS, MAX_MAX_DEPTH, MAX_MAX_RETRIES, MAX_PREVIEW_DEBOUNCE_MS,
    MAX_TIMEOUT_SECS,
};
use crate::types::{
    AuthConfig, AuthStrategy, CacheSettings, Config, ConnectionConfig, MappingSettings,
};

/// Configuration loader that merges file, environment and explicit values.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    cache_enabled: Option<bool>,
    cache_ttl: Option<Duration>,
    preview_debounce: Option<Duration>,
    max_depth: Option<usize>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// Skipped entirely when `DOTENV_DISABLED` is `true` or `1`. A missing
    /// file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DotenvParse`] for invalid syntax and
    /// [`ConfigError::DotenvIo`] when the file exists but cannot be read.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Use this config file instead of `TOWER_CONFIG_PATH`.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read values from the config file, if one is named.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_file(&mut self)?;
        Ok(self)
    }

    /// Read values from `TOWER_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    pub fn with_preview_debounce(mut self, debounce: Duration) -> Self {
        self.preview_debounce = Some(debounce);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Fails when the base URL or credentials are missing, or when any
    /// value is outside its allowed range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mapping = self.build_mapping_settings()?;
        let cache = self.build_cache_settings();

        let base_url = self
            .base_url
            .as_deref()
            .map(validate_and_normalize_base_url)
            .transpose()?
            .ok_or(ConfigError::MissingBaseUrl)?;

        let strategy = if let Some(token) = self.api_token {
            AuthStrategy::ApiToken { token }
        } else if let (Some(username), Some(password)) = (self.username, self.password) {
            AuthStrategy::SessionToken { username, password }
        } else {
            return Err(ConfigError::MissingAuth);
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        };
        Self::validate_connection(&connection)?;

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
            cache,
            mapping,
        })
    }

    /// Build only the mapping-editor settings.
    ///
    /// Offline commands need these without a server or credentials.
    pub fn build_mapping_settings(&self) -> Result<MappingSettings, ConfigError> {
        let settings = MappingSettings {
            preview_debounce: self
                .preview_debounce
                .unwrap_or(Duration::from_millis(DEFAULT_PREVIEW_DEBOUNCE_MS)),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        };

        if settings.preview_debounce.as_millis() > u128::from(MAX_PREVIEW_DEBOUNCE_MS) {
            return Err(ConfigError::InvalidDebounce {
                message: format!(
                    "must not exceed {MAX_PREVIEW_DEBOUNCE_MS} ms (got {} ms)",
                    settings.preview_debounce.as_millis()
                ),
            });
        }
        if settings.max_depth == 0 || settings.max_depth > MAX_MAX_DEPTH {
            return Err(ConfigError::InvalidMaxDepth {
                message: format!(
                    "must be between 1 and {MAX_MAX_DEPTH} (got {})",
                    settings.max_depth
                ),
            });
        }

        Ok(settings)
    }

    fn build_cache_settings(&self) -> CacheSettings {
        CacheSettings {
            enabled: self.cache_enabled.unwrap_or(true),
            ttl: self
                .cache_ttl
                .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
        }
    }

    /// Checks timeout and retry bounds.
    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {MAX_TIMEOUT_SECS} seconds"
                ),
            });
        }
        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {MAX_MAX_RETRIES} (got {})",
                    connection.max_retries
                ),
            });
        }

        Ok(())
    }

    // Internal accessors for the other loader modules

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_cache_enabled(&mut self, enabled: Option<bool>) {
        self.cache_enabled = enabled;
    }

    pub(crate) fn set_cache_ttl(&mut self, ttl: Option<Duration>) {
        self.cache_ttl = ttl;
    }

    pub(crate) fn set_preview_debounce(&mut self, debounce: Option<Duration>) {
        self.preview_debounce = debounce;
    }

    pub(crate) fn set_max_depth(&mut self, depth: Option<usize>) {
        self.max_depth = depth;
    }
}

/// Validates and normalizes a base URL string.
///
/// Rules:
/// - Blank input counts as missing.
/// - Must parse as an absolute http(s) URL with a host.
/// - Trailing slashes are stripped.
fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "base_url".into(),
        message: format!("must be an absolute http(s) URL with a host: {e}"),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: "host is required".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
