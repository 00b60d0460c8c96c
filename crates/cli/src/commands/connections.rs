//! Connections command implementation.
//!
//! Responsibilities:
//! - List connections and show one connection's settings.
//!
//! Invariants:
//! - Secret config values are masked in every output format.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use tower_config::Config;
use tracing::info;

use crate::commands::build_client;
use crate::formatters::{OutputFormat, get_formatter, output_result};

#[derive(Subcommand)]
pub enum ConnectionsCommand {
    /// List configured connections
    List,
    /// Show one connection and its settings
    Show {
        /// Connection id
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub async fn run(
    config: Config,
    command: ConnectionsCommand,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let client = build_client(&config)?;
    let format: OutputFormat = output_format.parse()?;
    let formatter = get_formatter(format);

    let output = match command {
        ConnectionsCommand::List => {
            info!("Listing connections");
            let connections = client
                .list_connections()
                .await
                .context("Failed to list connections")?;
            formatter.format_connections(&connections)?
        }
        ConnectionsCommand::Show { id } => {
            info!("Fetching connection {}", id);
            let connection = client
                .get_connection(&id)
                .await
                .with_context(|| format!("Failed to fetch connection '{}'", id))?;
            formatter.format_connection(&connection)?
        }
    };

    output_result(&output, format, output_file.as_ref())
}
