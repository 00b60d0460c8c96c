//! Table formatter implementation.
//!
//! Plain tab-separated rows with a header; empty lists print a short message.

use anyhow::Result;
use serde_json::Value;
use tower_client::{Connection, SaveResponse, TestResult};
use tower_mapping::{ExportEntry, FieldDescriptor};

use crate::formatters::{Formatter, PreviewOutput, SchemaOutput};

const MISSING_VALUE: &str = "N/A";

/// Table formatter.
pub struct TableFormatter;

fn fields_table(fields: &[FieldDescriptor]) -> String {
    if fields.is_empty() {
        return "No fields found.\n".to_string();
    }

    let mut output = String::from("ID\tPath\tType\tRequired\tSample\n");
    for field in fields {
        output.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            field.id,
            field.path,
            field.field_type,
            if field.required { "yes" } else { "no" },
            field.sample
        ));
    }
    output
}

fn mappings_table(mappings: &[ExportEntry]) -> String {
    if mappings.is_empty() {
        return "No mappings found.\n".to_string();
    }

    let mut output = String::from("Source\tTarget\tTransform\n");
    for entry in mappings {
        let transform = entry
            .transform
            .map_or(MISSING_VALUE, |transform| transform.as_str());
        output.push_str(&format!(
            "{}\t{}\t{}\n",
            entry.source_path, entry.target_path, transform
        ));
    }
    output
}

fn document(value: &Value) -> Result<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

impl Formatter for TableFormatter {
    fn format_fields(&self, fields: &[FieldDescriptor]) -> Result<String> {
        Ok(fields_table(fields))
    }

    fn format_mappings(&self, mappings: &[ExportEntry]) -> Result<String> {
        Ok(mappings_table(mappings))
    }

    fn format_preview(&self, preview: &PreviewOutput) -> Result<String> {
        let mut output = document(&preview.target)?;
        if !preview.notes.is_empty() {
            output.push_str("\nNotes:\n");
            for note in &preview.notes {
                output.push_str(&format!("  {}\n", note));
            }
        }
        Ok(output)
    }

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String> {
        let mut output = String::new();
        output.push_str("--- Source Fields ---\n");
        output.push_str(&fields_table(&schema.source_fields));
        output.push_str("\n--- Target Fields ---\n");
        output.push_str(&fields_table(&schema.target_fields));
        output.push_str("\n--- Saved Mappings ---\n");
        output.push_str(&mappings_table(&schema.mappings));
        Ok(output)
    }

    fn format_test_result(&self, result: &TestResult) -> Result<String> {
        let mut output = String::from("--- Source Data ---\n");
        output.push_str(&document(&result.source_data)?);
        output.push_str("\n--- Transformed Data ---\n");
        output.push_str(&document(&result.transformed_data)?);
        Ok(output)
    }

    fn format_save(&self, response: &SaveResponse) -> Result<String> {
        Ok(format!("Saved {} mapping(s).\n", response.saved))
    }

    fn format_connections(&self, connections: &[Connection]) -> Result<String> {
        if connections.is_empty() {
            return Ok("No connections found.\n".to_string());
        }

        let mut output = String::from("ID\tName\tType\tStatus\n");
        for connection in connections {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                connection.id,
                connection.name,
                connection.connection_type,
                connection.status.as_deref().unwrap_or(MISSING_VALUE)
            ));
        }
        Ok(output)
    }

    fn format_connection(&self, connection: &Connection) -> Result<String> {
        let mut output = String::from("--- Connection ---\n");
        output.push_str(&format!("ID: {}\n", connection.id));
        output.push_str(&format!("Name: {}\n", connection.name));
        output.push_str(&format!("Type: {}\n", connection.connection_type));
        output.push_str(&format!(
            "Status: {}\n",
            connection.status.as_deref().unwrap_or(MISSING_VALUE)
        ));
        if !connection.config.is_empty() {
            output.push_str("Config:\n");
            for entry in &connection.config {
                output.push_str(&format!("  {}\n", entry));
            }
        }
        Ok(output)
    }
}
