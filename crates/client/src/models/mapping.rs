//! Mapping API models.
//!
//! Request bodies live in `tower-mapping`; these are the responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_mapping::ExportEntry;

/// Response of `GET /api/mappings/schema`.
///
/// The field values are raw sample documents, not descriptors; run them
/// through the extractor to get field lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub source_fields: Value,
    pub target_fields: Value,
    /// Previously saved mappings, by path.
    #[serde(default)]
    pub mappings: Vec<ExportEntry>,
}

/// Response of `POST /api/mappings/test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub source_data: Value,
    pub transformed_data: Value,
}

/// The latest remote preview shown next to the editor.
pub type PreviewResult = TestResult;

/// Response of `POST /api/mappings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: usize,
}
