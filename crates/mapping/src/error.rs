//! Error types for the mapping crate.

use thiserror::Error;

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Errors raised while extracting fields or building mapping payloads.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The document nests deeper than the extractor allows.
    #[error("Schema nesting exceeds maximum depth of {max_depth} at '{path}'")]
    DepthExceeded { path: String, max_depth: usize },

    /// A mapping references a field id that is not in the current field list.
    #[error("Mapping {mapping} references unknown field '{field}'")]
    UnknownField { mapping: String, field: String },

    /// A field type string did not match any known type.
    #[error("Invalid field type: {0}")]
    InvalidFieldType(String),

    /// A transform id did not match the catalog.
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when executing a transform against a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The value cannot be converted by this transform.
    #[error("{transform} cannot convert {value}")]
    Unconvertible { transform: String, value: String },

    /// The transform needs parameters only the server knows about.
    #[error("{0} runs on the server only")]
    ServerOnly(String),
}
