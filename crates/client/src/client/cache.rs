//! Client-side response caching for API reads.
//!
//! Responsibilities:
//! - Cache decoded GET response bodies with a per-path-prefix TTL.
//! - Invalidate dependent entries after a successful mutating call.
//! - Expose cache statistics.
//!
//! Does NOT handle:
//! - Persistent disk caching (in-memory only).
//! - Cross-process cache sharing.
//!
//! Invariants:
//! - Only GET requests are cached.
//! - TTL is enforced per entry, not globally.
//! - The cache is owned by whoever builds the client; there is no global instance.
//! - Every invalidation bumps a generation counter. A read that started
//!   before an invalidation cannot repopulate the cache with its body.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use reqwest::Method;
use serde_json::Value;
use tower_config::CacheSettings;
use tower_config::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_CONNECTION_TYPES_TTL_SECS,
};
use tracing::{debug, trace};

use crate::metrics::MetricsCollector;

pub const SCHEMA_PATH: &str = "/api/mappings/schema";
pub const MAPPINGS_PATH: &str = "/api/mappings";
pub const CONNECTIONS_PATH: &str = "/api/connections";
pub const CONNECTION_TYPES_PATH: &str = "/api/connection-types";

/// A cached response body.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub body: Value,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(body: Value, ttl: Duration) -> Self {
        Self {
            body,
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.cached_at) > self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Cache key: request path plus sorted query parameters.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub path: String,
    pub query_params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(path: impl Into<String>, mut query_params: Vec<(String, String)>) -> Self {
        query_params.sort();
        Self {
            path: path.into(),
            query_params,
        }
    }
}

/// Cache policy for an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    NoCache,
    CacheWithTtl(Duration),
}

/// Per-prefix TTL policies and invalidation dependencies.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    policies: HashMap<String, CachePolicy>,
    /// Mutated path prefix -> cached prefixes that go stale with it.
    dependencies: Vec<(String, Vec<String>)>,
    default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

impl CacheConfig {
    /// Default policies with `ttl` for ordinary reads.
    pub fn new(ttl: Duration) -> Self {
        let mut config = Self {
            policies: HashMap::new(),
            dependencies: Vec::new(),
            default_ttl: ttl,
        };

        config.set_policy(SCHEMA_PATH, CachePolicy::CacheWithTtl(ttl));
        config.set_policy(CONNECTIONS_PATH, CachePolicy::CacheWithTtl(ttl));
        // Connection types only change with a server release.
        config.set_policy(
            CONNECTION_TYPES_PATH,
            CachePolicy::CacheWithTtl(Duration::from_secs(DEFAULT_CONNECTION_TYPES_TTL_SECS)),
        );

        config.add_dependency(MAPPINGS_PATH, [SCHEMA_PATH]);
        config.add_dependency(CONNECTIONS_PATH, [CONNECTIONS_PATH, SCHEMA_PATH]);
        config
    }

    /// Get the cache policy for a path, by longest matching prefix.
    pub fn policy_for(&self, endpoint: &str) -> CachePolicy {
        let mut best_match: Option<(&str, CachePolicy)> = None;

        for (prefix, policy) in &self.policies {
            if endpoint.starts_with(prefix.as_str())
                && best_match.is_none_or(|(current, _)| prefix.len() > current.len())
            {
                best_match = Some((prefix, *policy));
            }
        }

        best_match.map_or(
            CachePolicy::CacheWithTtl(self.default_ttl),
            |(_, policy)| policy,
        )
    }

    pub fn set_policy(&mut self, prefix: impl Into<String>, policy: CachePolicy) {
        self.policies.insert(prefix.into(), policy);
    }

    pub fn set_default_ttl(&mut self, ttl: Duration) {
        self.default_ttl = ttl;
    }

    /// Register cached prefixes that a mutation under `mutated` makes stale.
    pub fn add_dependency<I, S>(&mut self, mutated: impl Into<String>, dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.push((
            mutated.into(),
            dependents.into_iter().map(Into::into).collect(),
        ));
    }

    /// Every cached prefix that depends on a mutation of `path`.
    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        let mut dependents: Vec<&str> = self
            .dependencies
            .iter()
            .filter(|(mutated, _)| path.starts_with(mutated.as_str()))
            .flat_map(|(_, deps)| deps.iter().map(String::as_str))
            .collect();
        dependents.sort_unstable();
        dependents.dedup();
        dependents
    }
}

/// Client-side response cache.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    inner: MokaCache<CacheKey, CacheEntry>,
    config: CacheConfig,
    enabled: bool,
    generation: Arc<AtomicU64>,
    metrics: Option<MetricsCollector>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .support_invalidation_closures()
            .build();

        Self {
            inner: cache,
            config: CacheConfig::default(),
            enabled: true,
            generation: Arc::new(AtomicU64::new(0)),
            metrics: None,
        }
    }

    /// Create a disabled cache (no caching).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::with_capacity(1)
        }
    }

    /// Build a cache from loaded settings.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        if !settings.enabled {
            return Self::disabled();
        }
        Self::new().with_config(CacheConfig::new(settings.ttl))
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a cached body, dropping it if expired.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        self.get_at(key, Instant::now()).await
    }

    pub async fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        match self.inner.get(key).await {
            Some(entry) if !entry.is_expired_at(now) => {
                trace!("Cache hit for key: {}", key.path);
                self.record_hit();
                Some(entry.body)
            }
            Some(_) => {
                trace!("Cache entry expired for key: {}", key.path);
                self.inner.invalidate(key).await;
                self.record_miss();
                None
            }
            None => {
                trace!("Cache miss for key: {}", key.path);
                self.record_miss();
                None
            }
        }
    }

    /// Store a body under the TTL its path's policy gives.
    pub async fn insert(&self, key: CacheKey, body: Value) {
        let CachePolicy::CacheWithTtl(ttl) = self.should_cache_request(&Method::GET, &key.path)
        else {
            return;
        };
        trace!("Caching entry for key: {}", key.path);
        self.inner.insert(key, CacheEntry::new(body, ttl)).await;
    }

    /// Current invalidation generation; capture it before sending a read.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Store a body read at `generation`, unless something was invalidated
    /// since. Returns whether the entry was kept.
    pub async fn insert_if_current(&self, key: CacheKey, body: Value, generation: u64) -> bool {
        if self.generation() != generation {
            debug!(
                path = %key.path,
                "Skipping cache insert for a read outdated by invalidation"
            );
            return false;
        }
        self.insert(key.clone(), body).await;
        // an invalidation may have landed while inserting
        if self.generation() != generation {
            self.inner.invalidate(&key).await;
            return false;
        }
        true
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.bump_generation();
        self.inner.invalidate(key).await;
        trace!("Invalidated cache entry for key: {}", key.path);
    }

    /// Invalidate all entries whose path starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.bump_generation();
        let prefix_owned = prefix.to_string();
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| key.path.starts_with(&prefix_owned))
        {
            debug!("Prefix invalidation unavailable: {}", e);
        }
        debug!("Invalidated cache entries with prefix: {}", prefix);
    }

    /// Invalidate everything that depends on a mutation of `path`.
    pub fn invalidate_dependents(&self, path: &str) {
        for prefix in self.config.dependents_of(path) {
            self.invalidate_prefix(prefix);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.bump_generation();
        self.inner.invalidate_all();
        debug!("Invalidated all cache entries");
    }

    pub fn should_cache_request(&self, method: &Method, endpoint: &str) -> CachePolicy {
        if !self.enabled || *method != Method::GET {
            return CachePolicy::NoCache;
        }
        self.config.policy_for(endpoint)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
            enabled: self.enabled,
        }
    }

    fn record_hit(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_hit();
        }
    }

    fn record_miss(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_miss();
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStats {
    pub entry_count: u64,
    pub enabled: bool,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache {{ entries: {}, enabled: {} }}",
            self.entry_count, self.enabled
        )
    }
}
