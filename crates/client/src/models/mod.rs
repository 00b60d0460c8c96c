//! Data models for Tower API responses.
//!
//! Types are organized by resource in submodules and re-exported here.

pub mod connection;
pub mod mapping;

pub use connection::{ConfigEntry, Connection, ConnectionType, ConnectionUpdate, SECRET_MASK};
pub use mapping::{PreviewResult, SaveResponse, SchemaResponse, TestResult};
