//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide the `table` and `json` output formats.
//! - Implement the `Formatter` trait for every result type the commands print.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings, see `output_result`).
//!
//! Invariants:
//! - Tables are tab-separated with a header row.
//! - Empty JSON results are valid JSON (`[]`); empty tables print a human message.
//! - Connection secrets are masked in every format.

mod common;
mod json;
mod table;


use std::str::FromStr;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tower_client::{Connection, SaveResponse, TestResult};
use tower_mapping::{ExportEntry, FieldDescriptor};

pub use common::{output_result, write_to_file};
pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: json, table", s),
        }
    }
}

/// Fields of both sides plus the saved mappings for a connection type pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOutput {
    pub source_fields: Vec<FieldDescriptor>,
    pub target_fields: Vec<FieldDescriptor>,
    pub mappings: Vec<ExportEntry>,
}

/// A locally rendered target document.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutput {
    pub target: Value,
    pub notes: Vec<String>,
}

/// Formatter trait for different output types.
pub trait Formatter {
    fn format_fields(&self, fields: &[FieldDescriptor]) -> Result<String>;

    /// Format mappings as resolved paths.
    fn format_mappings(&self, mappings: &[ExportEntry]) -> Result<String>;

    fn format_preview(&self, preview: &PreviewOutput) -> Result<String>;

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String>;

    /// Format the server's answer to a mapping test.
    fn format_test_result(&self, result: &TestResult) -> Result<String>;

    fn format_save(&self, response: &SaveResponse) -> Result<String>;

    fn format_connections(&self, connections: &[Connection]) -> Result<String>;

    fn format_connection(&self, connection: &Connection) -> Result<String>;
}

/// Get a formatter for the given format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}
