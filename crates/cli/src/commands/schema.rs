//! Schema command implementation.
//!
//! Responsibilities:
//! - Fetch the sample documents and saved mappings for a connection type pair.
//! - Print the extracted fields of both sides and the saved mappings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tower_config::Config;
use tracing::info;

use crate::commands::{MappingSession, build_client};
use crate::formatters::{OutputFormat, SchemaOutput, get_formatter, output_result};

pub async fn run(
    config: Config,
    source_type: &str,
    target_type: &str,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    info!("Fetching schema for {} -> {}", source_type, target_type);
    let client = build_client(&config)?;
    let schema = client
        .get_schema(source_type, target_type)
        .await
        .context("Failed to fetch schema")?;

    let session = MappingSession::from_documents(
        &schema.source_fields,
        &schema.target_fields,
        config.mapping.max_depth,
    )?;
    let output = SchemaOutput {
        source_fields: session.source_fields,
        target_fields: session.target_fields,
        mappings: schema.mappings,
    };

    let format: OutputFormat = output_format.parse()?;
    let formatted = get_formatter(format).format_schema(&output)?;
    output_result(&formatted, format, output_file.as_ref())
}
