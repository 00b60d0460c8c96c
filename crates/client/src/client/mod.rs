//! Tower mapping API client.
//!
//! This module provides [`TowerClient`], the entry point for the remote
//! mapping and connection endpoints.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - [`cache`]: TTL response cache with dependency invalidation
//! - `dedup`: in-flight request sharing (private)
//! - `session`: token retrieval and the 401 refresh-and-retry (private)
//! - `mappings`, `connections`: typed API methods
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Token storage (delegated to [`crate::auth::SessionManager`])
//!
//! # Invariants
//! - Every call goes through [`TowerClient::execute`]: cache lookup for GETs,
//!   then deduplication, then the authenticated send.
//! - A successful mutating call invalidates the cache prefixes depending on it.
//! - Clones share the session, cache, in-flight map and event channel.

pub mod builder;
pub mod cache;
mod connections;
mod dedup;
mod mappings;
mod session;

use std::sync::Arc;

use futures::FutureExt;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use crate::auth::{AuthEvent, SessionManager};
use crate::endpoints::ApiRequest;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use cache::{CacheKey, ResponseCache};
use dedup::InFlight;

/// Tower mapping API client.
///
/// ```rust,ignore
/// use tower_client::{AuthStrategy, TowerClient};
/// use secrecy::SecretString;
///
/// let client = TowerClient::builder()
///     .base_url("https://tower.example.com".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("my-token".to_string().into()),
///     })
///     .build()?;
/// let schema = client.get_schema("shopify", "erp").await?;
/// ```
#[derive(Debug, Clone)]
pub struct TowerClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session: Arc<Mutex<SessionManager>>,
    pub(crate) api_token_auth: bool,
    pub(crate) max_retries: usize,
    pub(crate) cache: ResponseCache,
    pub(crate) inflight: InFlight,
    pub(crate) events: broadcast::Sender<AuthEvent>,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl TowerClient {
    /// Create a new client builder.
    pub fn builder() -> builder::TowerClientBuilder {
        builder::TowerClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The response cache this client reads and writes.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Subscribe to session events such as [`AuthEvent::LoginRequired`].
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Run one API call through the cache, deduplication and auth layers.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Value> {
        if request.method == Method::GET {
            let key = CacheKey::new(request.path.clone(), request.query.clone());
            if let Some(body) = self.cache.get(&key).await {
                debug!(path = %request.path, "Serving cached response");
                return Ok(body);
            }
        }

        let key = request.key();
        let this = self.clone();
        self.inflight
            .run(key, move || {
                async move { this.fetch(request).await.map_err(Arc::new) }.boxed()
            })
            .await
            .map_err(ClientError::from_shared)
    }

    /// Send a request and update the cache from its outcome.
    async fn fetch(&self, request: ApiRequest) -> Result<Value> {
        let method = request.method.as_str();
        if let Some(metrics) = &self.metrics {
            metrics.record_request(&request.path, method);
        }
        debug!(method, path = %request.path, "Sending request");

        let generation = self.cache.generation();
        let result = self.send_with_auth(&request).await;
        match &result {
            Ok(body) if request.method == Method::GET => {
                let key = CacheKey::new(request.path.clone(), request.query.clone());
                self.cache
                    .insert_if_current(key, body.clone(), generation)
                    .await;
            }
            Ok(_) if request.mutates => self.cache.invalidate_dependents(&request.path),
            Ok(_) => {}
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(&request.path, method, e);
                }
            }
        }
        result
    }
}

/// Decode a response body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(body: Value, path: &str) -> Result<T> {
    serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(format!("{path}: {e}")))
}

/// Encode a request body.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Mapping(e.into()))
}
