//! Configuration context for command execution.
//!
//! Responsibilities:
//! - Merge config file, environment and CLI flags through `ConfigLoader`.
//! - Give remote commands a full validated `Config` and offline commands only
//!   the mapping settings, so they run without a server or credentials.
//!
//! Does NOT handle:
//! - CLI argument definitions (see `args` module).
//!
//! Invariants:
//! - Offline contexts cannot be turned into a connection config.
//! - CLI flags take precedence over environment variables and the config file.

use std::time::Duration;

use anyhow::{Context, Result};
use tower_config::{Config, ConfigLoader, MappingSettings};

use crate::args::Cli;

pub(crate) enum ConfigCommandContext {
    /// Validated connection config for commands that call the server.
    Real(Box<Config>),
    /// Mapping settings only, for commands that work on local files.
    Offline(MappingSettings),
}

impl ConfigCommandContext {
    /// Build the context the parsed command needs.
    pub(crate) fn load(cli: &Cli) -> Result<Self> {
        let loader = loader_for(cli)?;
        if cli.command.is_remote() {
            Ok(Self::Real(Box::new(loader.build()?)))
        } else {
            Ok(Self::Offline(loader.build_mapping_settings()?))
        }
    }

    /// Extract the connection config, failing for offline contexts.
    pub(crate) fn into_real_config(self) -> Result<Config> {
        match self {
            ConfigCommandContext::Real(config) => Ok(*config),
            ConfigCommandContext::Offline(_) => {
                anyhow::bail!(
                    "Internal error: attempted to use offline settings for an operation requiring connection details"
                )
            }
        }
    }

    pub(crate) fn mapping_settings(&self) -> &MappingSettings {
        match self {
            ConfigCommandContext::Real(config) => &config.mapping,
            ConfigCommandContext::Offline(settings) => settings,
        }
    }
}

fn loader_for(cli: &Cli) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();

    // Blank values are ignored so TOWER_CONFIG_PATH="" behaves like unset
    if let Some(path) = &cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }

    loader = loader
        .from_file()
        .context("Failed to load configuration file")?
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(url) = &cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(username) = &cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(password) = &cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(token) = &cli.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(depth) = cli.max_depth {
        loader = loader.with_max_depth(depth);
    }
    if cli.no_cache {
        loader = loader.with_cache_enabled(false);
    }

    Ok(loader)
}
