//! Connection configuration and the top-level `Config`.

use std::time::Duration;

use secrecy::SecretString;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::types::auth::{AuthConfig, AuthStrategy};
use crate::types::settings::{CacheSettings, MappingSettings};

/// Connection settings for the Tower API.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the API, normalized without a trailing slash.
    pub base_url: String,
    /// Whether to skip TLS verification (self-signed certificates).
    pub skip_verify: bool,
    pub timeout: Duration,
    /// Retries for rate-limited requests.
    pub max_retries: usize,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub auth: AuthConfig,
    pub cache: CacheSettings,
    pub mapping: MappingSettings,
}

impl Config {
    /// Configuration with API token auth and default settings.
    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self::with_strategy(base_url, AuthStrategy::ApiToken { token })
    }

    /// Configuration with username/password auth and default settings.
    pub fn with_session_token(base_url: String, username: String, password: SecretString) -> Self {
        Self::with_strategy(base_url, AuthStrategy::SessionToken { username, password })
    }

    fn with_strategy(base_url: String, strategy: AuthStrategy) -> Self {
        Self {
            connection: ConnectionConfig {
                base_url,
                skip_verify: false,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                max_retries: DEFAULT_MAX_RETRIES,
            },
            auth: AuthConfig { strategy },
            cache: CacheSettings::default(),
            mapping: MappingSettings::default(),
        }
    }
}
