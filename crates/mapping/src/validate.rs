//! Non-blocking mapping validation.

use std::fmt;

use serde::Serialize;

use crate::field::{FieldDescriptor, FieldId};
use crate::store::Mapping;

/// A problem worth showing to the user that does not prevent saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationWarning {
    /// A required target field has no mapping.
    MissingRequired { field: FieldId, path: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::MissingRequired { path, .. } => {
                write!(f, "Required field '{path}' is not mapped")
            }
        }
    }
}

/// Warn about required target fields that nothing maps onto.
pub fn missing_required(
    target_fields: &[FieldDescriptor],
    mappings: &[Mapping],
) -> Vec<ValidationWarning> {
    target_fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| !mappings.iter().any(|m| m.target_field == f.id))
        .map(|f| ValidationWarning::MissingRequired {
            field: f.id.clone(),
            path: f.path.clone(),
        })
        .collect()
}
