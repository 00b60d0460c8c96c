//! Client builder for constructing [`TowerClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (base_url, auth_strategy)
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`TowerClient`] methods)
//! - Session token management (handled by [`SessionManager`] in `auth.rs`)
//!
//! # Invariants
//! - `base_url` and `auth_strategy` are required
//! - The base URL is always normalized to have no trailing slashes
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning
//! - Without an explicit cache the client gets its own default [`ResponseCache`]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tower_config::Config;
use tower_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

use super::cache::ResponseCache;
use super::dedup::InFlight;
use crate::auth::{AuthStrategy, SessionManager};
use crate::client::TowerClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Capacity of the auth event channel; slow subscribers miss old events.
const AUTH_EVENT_CAPACITY: usize = 16;

/// Builder for creating a new [`TowerClient`].
pub struct TowerClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    max_retries: usize,
    cache: Option<ResponseCache>,
    metrics: Option<MetricsCollector>,
}

impl Default for TowerClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            cache: None,
            metrics: None,
        }
    }
}

impl TowerClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the Tower API, e.g. `https://tower.example.com`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this in development or testing environments.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for rate-limited requests.
    ///
    /// Default is 3 retries with exponential backoff (1s, 2s, 4s delays).
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Use this response cache instead of a private default one.
    ///
    /// Pass a clone of the same cache to several clients to share entries.
    pub fn cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.auth_strategy = Some(AuthStrategy::from(&config.auth.strategy));
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.max_retries = config.connection.max_retries;
        self.cache = Some(ResponseCache::from_settings(&config.cache));
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`TowerClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided.
    /// Returns [`ClientError::AuthFailed`] if `auth_strategy` was not provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<TowerClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let auth_strategy = self
            .auth_strategy
            .ok_or_else(|| ClientError::AuthFailed("auth_strategy is required".to_string()))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        let cache = match (self.cache, &self.metrics) {
            (Some(cache), _) => cache,
            (None, Some(metrics)) => ResponseCache::new().with_metrics(metrics.clone()),
            (None, None) => ResponseCache::new(),
        };
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        let api_token_auth = matches!(auth_strategy, AuthStrategy::ApiToken { .. });

        Ok(TowerClient {
            http,
            base_url,
            session: Arc::new(Mutex::new(SessionManager::new(auth_strategy))),
            api_token_auth,
            max_retries: self.max_retries,
            cache,
            inflight: InFlight::new(self.metrics.clone()),
            events,
            metrics: self.metrics,
        })
    }
}
