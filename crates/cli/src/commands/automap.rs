//! Automap command implementation.
//!
//! Responsibilities:
//! - Propose mappings between two sample documents by field name.
//! - Warn about required target fields left unmapped.
//! - Optionally export the proposals for `preview`, `test` and `save`.
//!
//! Invariants:
//! - Warnings never fail the command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tower_config::MappingSettings;
use tower_mapping::export_json;
use tracing::info;

use crate::commands::{MappingSession, read_json};
use crate::formatters::{OutputFormat, get_formatter, output_result, write_to_file};

pub fn run(
    source: &Path,
    target: &Path,
    export: Option<&Path>,
    settings: &MappingSettings,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let mut session =
        MappingSession::from_documents(&read_json(source)?, &read_json(target)?, settings.max_depth)?;
    let proposed = session.auto_map();
    info!(proposed, "Auto-mapped fields");
    session.report_warnings();

    let entries = session.entries()?;
    if let Some(path) = export {
        let json = export_json(
            session.store.mappings(),
            &session.source_fields,
            &session.target_fields,
        )?;
        write_to_file(&json, path)
            .with_context(|| format!("Failed to export mappings to {}", path.display()))?;
        eprintln!("Exported {} mapping(s) to {}", entries.len(), path.display());
    }

    let format: OutputFormat = output_format.parse()?;
    let output = get_formatter(format).format_mappings(&entries)?;
    output_result(&output, format, output_file.as_ref())
}
