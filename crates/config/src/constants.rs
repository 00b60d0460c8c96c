//! Centralized constants for the Tower workspace.
//!
//! Default values shared by the config loader, the HTTP client and the CLI.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound for configured retries.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Response Cache Defaults
// =============================================================================

/// Default TTL for cached GET responses in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// TTL for the connection type catalog, which rarely changes (1 hour).
pub const DEFAULT_CONNECTION_TYPES_TTL_SECS: u64 = 3600;

/// Default number of cached responses.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

// =============================================================================
// Mapping Editor Defaults
// =============================================================================

/// Quiet period before an edited mapping set is sent for testing.
pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 500;

/// Upper bound for the preview quiet period.
pub const MAX_PREVIEW_DEBOUNCE_MS: u64 = 10_000;

/// Default nesting limit for field extraction.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Upper bound for the field extraction nesting limit.
pub const MAX_MAX_DEPTH: usize = 256;
