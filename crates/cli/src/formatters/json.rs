//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format all result types as pretty-printed JSON, with a trailing newline.

use anyhow::Result;
use serde::Serialize;
use tower_client::{Connection, SaveResponse, TestResult};
use tower_mapping::{ExportEntry, FieldDescriptor};

use crate::formatters::{Formatter, PreviewOutput, SchemaOutput};

/// JSON formatter.
pub struct JsonFormatter;

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

impl Formatter for JsonFormatter {
    fn format_fields(&self, fields: &[FieldDescriptor]) -> Result<String> {
        pretty(fields)
    }

    fn format_mappings(&self, mappings: &[ExportEntry]) -> Result<String> {
        pretty(mappings)
    }

    fn format_preview(&self, preview: &PreviewOutput) -> Result<String> {
        pretty(preview)
    }

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String> {
        pretty(schema)
    }

    fn format_test_result(&self, result: &TestResult) -> Result<String> {
        pretty(result)
    }

    fn format_save(&self, response: &SaveResponse) -> Result<String> {
        pretty(response)
    }

    fn format_connections(&self, connections: &[Connection]) -> Result<String> {
        let masked: Vec<Connection> = connections.iter().map(Connection::masked).collect();
        pretty(&masked)
    }

    fn format_connection(&self, connection: &Connection) -> Result<String> {
        pretty(&connection.masked())
    }
}
