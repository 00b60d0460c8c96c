//! Configuration management for Tower mapping tools.
//!
//! This crate provides types and loaders for the remote connection, auth
//! and mapping-editor settings, read from `.env` files, environment
//! variables and an optional JSON config file.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigFile, ConfigLoader, env_var_or_none};
pub use types::{
    AuthConfig, AuthStrategy, CacheSettings, Config, ConnectionConfig, MappingSettings,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
