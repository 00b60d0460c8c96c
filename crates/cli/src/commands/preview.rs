//! Preview command implementation.
//!
//! Renders the target document locally by running the source sample through
//! the mappings. Transforms that only run on the server are copied through
//! unchanged and listed as notes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tower_config::MappingSettings;
use tower_mapping::render;

use crate::commands::{MappingSession, read_json};
use crate::formatters::{OutputFormat, PreviewOutput, get_formatter, output_result};

pub fn run(
    source: &Path,
    target: &Path,
    mappings: Option<&Path>,
    settings: &MappingSettings,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let source_data = read_json(source)?;
    let mut session =
        MappingSession::from_documents(&source_data, &read_json(target)?, settings.max_depth)?;
    session.populate(mappings, &[])?;
    session.report_warnings();

    let preview = render(
        &source_data,
        session.store.mappings(),
        &session.source_fields,
        &session.target_fields,
    );
    let output = PreviewOutput {
        target: preview.target,
        notes: preview.notes.iter().map(ToString::to_string).collect(),
    };

    let format: OutputFormat = output_format.parse()?;
    let formatted = get_formatter(format).format_preview(&output)?;
    output_result(&formatted, format, output_file.as_ref())
}
