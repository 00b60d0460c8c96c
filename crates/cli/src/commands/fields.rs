//! Fields command implementation.
//!
//! Responsibilities:
//! - Flatten a sample JSON document into field descriptors and print them.
//!
//! Does NOT handle:
//! - Comparing two documents (see `automap`).

use std::path::{Path, PathBuf};

use anyhow::Result;
use tower_config::MappingSettings;
use tower_mapping::{FieldExtractor, Side};
use tracing::info;

use crate::commands::read_json;
use crate::formatters::{OutputFormat, get_formatter, output_result};

pub fn run(
    file: &Path,
    side: Side,
    settings: &MappingSettings,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let document = read_json(file)?;
    let fields = FieldExtractor::new(side)
        .with_max_depth(settings.max_depth)
        .extract(&document)?;
    info!(count = fields.len(), ?side, "Extracted fields");

    let format: OutputFormat = output_format.parse()?;
    let output = get_formatter(format).format_fields(&fields)?;
    output_result(&output, format, output_file.as_ref())
}
