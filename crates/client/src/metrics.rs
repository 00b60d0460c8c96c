//! Metrics collection for Tower API calls.
//!
//! Responsibilities:
//! - Name the counters the client records.
//! - Categorize errors for the `error_category` label.
//!
//! Does NOT handle:
//! - Metrics export. No recorder is installed by this crate; the counters
//!   are no-ops until the embedding application installs one.
//!
//! Invariants:
//! - Label names are consistent: `endpoint`, `method`, `error_category`.
//! - Recording never fails and never blocks a request.

use crate::error::ClientError;

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "tower_api_requests_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "tower_api_errors_total";

/// Metric name for cache hit counter.
pub const METRIC_CACHE_HITS: &str = "tower_api_cache_hits_total";

/// Metric name for cache miss counter.
pub const METRIC_CACHE_MISSES: &str = "tower_api_cache_misses_total";

/// Metric name for calls that joined an identical in-flight request.
pub const METRIC_DEDUPLICATED_TOTAL: &str = "tower_api_deduplicated_total";

/// Metric name for 401-triggered session refreshes.
pub const METRIC_AUTH_RETRIES_TOTAL: &str = "tower_api_auth_retries_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection refused, DNS, reset and other transport failures.
    Transport,
    Http4xx,
    Http5xx,
    /// Auth could not be recovered.
    Auth,
    /// Response body did not match the expected shape.
    Decode,
    Unknown,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Decode => "decode",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error.root() {
            ClientError::ApiError { status, .. } if (400..500).contains(status) => {
                ErrorCategory::Http4xx
            }
            ClientError::ApiError { status, .. } if (500..600).contains(status) => {
                ErrorCategory::Http5xx
            }
            ClientError::HttpError(e) if e.is_connect() || e.is_timeout() => {
                ErrorCategory::Transport
            }
            ClientError::HttpError(e) if e.is_decode() => ErrorCategory::Decode,
            ClientError::InvalidResponse(_) => ErrorCategory::Decode,
            ClientError::LoginRequired | ClientError::AuthFailed(_) => ErrorCategory::Auth,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Thin wrapper over the `metrics` macros with consistent labels.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    enabled: bool,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a request that went to the network.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    pub fn record_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        if !self.enabled {
            return;
        }
        let category = ErrorCategory::from(error);
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    pub fn record_cache_hit(&self) {
        if self.enabled {
            metrics::counter!(METRIC_CACHE_HITS).increment(1);
        }
    }

    pub fn record_cache_miss(&self) {
        if self.enabled {
            metrics::counter!(METRIC_CACHE_MISSES).increment(1);
        }
    }

    pub fn record_deduplicated(&self, endpoint: &str) {
        if self.enabled {
            metrics::counter!(METRIC_DEDUPLICATED_TOTAL, "endpoint" => endpoint.to_string())
                .increment(1);
        }
    }

    pub fn record_auth_retry(&self) {
        if self.enabled {
            metrics::counter!(METRIC_AUTH_RETRIES_TOTAL).increment(1);
        }
    }
}
