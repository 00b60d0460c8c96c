//! Client-side mapping export and re-import.
//!
//! Exports carry paths, not field ids, so they survive re-extraction. The
//! same entry shape is what the schema endpoint returns for saved mappings,
//! which is why `import_entries` is also used to rehydrate a store after
//! loading a schema.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::automap::MappingProposal;
use crate::error::Result;
use crate::field::{FieldDescriptor, find_by_path};
use crate::payload::resolve;
use crate::store::Mapping;
use crate::transform::TransformId;

/// One exported mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub source_path: String,
    pub target_path: String,
    pub transform: Option<TransformId>,
}

/// Result of resolving exported entries against current field lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub proposals: Vec<MappingProposal>,
    /// Entries whose source or target path is not in the current field lists.
    pub unresolved: Vec<ExportEntry>,
}

pub fn export_entries(
    mappings: &[Mapping],
    source_fields: &[FieldDescriptor],
    target_fields: &[FieldDescriptor],
) -> Result<Vec<ExportEntry>> {
    mappings
        .iter()
        .map(|m| {
            let (source, target) = resolve(m, source_fields, target_fields)?;
            Ok(ExportEntry {
                source_path: source.path.clone(),
                target_path: target.path.clone(),
                transform: m.transform,
            })
        })
        .collect()
}

/// Serialize the mapping list as a pretty-printed JSON array.
pub fn export_json(
    mappings: &[Mapping],
    source_fields: &[FieldDescriptor],
    target_fields: &[FieldDescriptor],
) -> Result<String> {
    let entries = export_entries(mappings, source_fields, target_fields)?;
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn parse_export(json: &str) -> Result<Vec<ExportEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Resolve exported entries to proposals against freshly extracted fields.
pub fn import_entries(
    entries: &[ExportEntry],
    source_fields: &[FieldDescriptor],
    target_fields: &[FieldDescriptor],
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    for entry in entries {
        let source = find_by_path(source_fields, &entry.source_path);
        let target = find_by_path(target_fields, &entry.target_path);
        match (source, target) {
            (Some(source), Some(target)) => outcome.proposals.push(MappingProposal {
                source_field: source.id.clone(),
                target_field: target.id.clone(),
                transform: entry.transform,
            }),
            _ => {
                debug!(
                    source_path = %entry.source_path,
                    target_path = %entry.target_path,
                    "Saved mapping no longer matches the schema"
                );
                outcome.unresolved.push(entry.clone());
            }
        }
    }
    outcome
}
