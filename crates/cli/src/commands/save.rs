//! Save command implementation.
//!
//! Responsibilities:
//! - Send the chosen mapping set to the server for a connection.
//!
//! Invariants:
//! - Unmapped required fields produce warnings, never a refusal to save.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tower_config::Config;
use tower_mapping::SaveMappingsPayload;
use tracing::info;

use crate::args::RemoteMappingArgs;
use crate::commands::{build_client, remote_session};
use crate::formatters::{OutputFormat, get_formatter, output_result};

pub async fn run(
    config: Config,
    args: &RemoteMappingArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let client = build_client(&config)?;
    let session = remote_session(&client, args, config.mapping.max_depth).await?;
    let warnings = session.report_warnings();

    let payload = SaveMappingsPayload::build(
        &args.connection,
        &args.source_type,
        &args.target_type,
        session.store.mappings(),
        &session.source_fields,
        &session.target_fields,
    )?;
    info!(
        connection = %args.connection,
        mappings = payload.mappings.len(),
        warnings = warnings.len(),
        "Saving mappings"
    );

    let response = client
        .save_mappings(&payload)
        .await
        .context("Failed to save mappings")?;

    let format: OutputFormat = output_format.parse()?;
    let output = get_formatter(format).format_save(&response)?;
    output_result(&output, format, output_file.as_ref())
}
