//! Configuration type definitions.
//!
//! Responsibilities:
//! - Define the connection, auth, cache and mapping-editor settings.
//!
//! Does NOT handle:
//! - Loading from files or environment variables (see `loader`).
//! - Network connections or authentication flows (see `tower-client`).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.

mod auth;
mod connection;
mod settings;

pub use auth::{AuthConfig, AuthStrategy};
pub use connection::{Config, ConnectionConfig};
pub use settings::{CacheSettings, MappingSettings};
