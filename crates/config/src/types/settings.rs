//! Response cache and mapping editor settings.
//!
//! These do not depend on a server or credentials, so they can be built
//! on their own for offline commands.

use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_DEPTH, DEFAULT_PREVIEW_DEBOUNCE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    /// TTL for GET responses without a more specific policy.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSettings {
    /// Quiet period before a changed mapping set is tested remotely.
    pub preview_debounce: Duration,
    /// Nesting limit for field extraction.
    pub max_depth: usize,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            preview_debounce: Duration::from_millis(DEFAULT_PREVIEW_DEBOUNCE_MS),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
