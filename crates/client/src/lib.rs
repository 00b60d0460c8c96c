//! Tower mapping API client.
//!
//! This crate provides an async client for the remote mapping and connection
//! endpoints. It handles bearer authentication with one session refresh on
//! 401, shares identical in-flight requests, caches reads with a per-path
//! TTL and runs debounced mapping tests for the editor preview.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod models;
pub mod preview;

pub use auth::{AuthEvent, AuthStrategy, SessionManager};
pub use client::TowerClient;
pub use client::builder::TowerClientBuilder;
pub use client::cache::{CacheConfig, CachePolicy, CacheStats, ResponseCache};
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    ConfigEntry, Connection, ConnectionType, ConnectionUpdate, PreviewResult, SECRET_MASK,
    SaveResponse, SchemaResponse, TestResult,
};
pub use preview::{MappingTester, PreviewOutcome, PreviewRunner};
