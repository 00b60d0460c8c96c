//! Request payloads for the remote mapping API.
//!
//! Responsibilities:
//! - Resolve mapping field ids to the paths and types the server understands.
//! - Build the test request (`mappingMetadata`) and the save payload.
//!
//! Does NOT handle:
//! - Sending requests (see `tower-client`).
//!
//! Invariants:
//! - Field ids are session-scoped, so payloads always carry resolved paths.
//! - A mapping whose field ids no longer resolve fails the whole payload with
//!   `MappingError::UnknownField`; nothing is silently dropped.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};
use crate::field::{FieldDescriptor, FieldId, FieldType, find_field};
use crate::hash::content_hash;
use crate::store::{Mapping, MappingId};
use crate::transform::TransformId;

/// Resolved description of one mapping, as sent to the test endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingMetadata {
    pub source_path: String,
    pub target_path: String,
    pub source_type: FieldType,
    pub target_type: FieldType,
    pub transform: Option<TransformId>,
}

/// Body of `POST /api/mappings/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMappingsRequest {
    pub connection_id: String,
    pub source_type: String,
    pub target_type: String,
    pub mapping_metadata: Vec<MappingMetadata>,
}

impl TestMappingsRequest {
    pub fn build(
        connection_id: impl Into<String>,
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        mappings: &[Mapping],
        source_fields: &[FieldDescriptor],
        target_fields: &[FieldDescriptor],
    ) -> Result<Self> {
        let mapping_metadata = mappings
            .iter()
            .map(|m| {
                let (source, target) = resolve(m, source_fields, target_fields)?;
                Ok(MappingMetadata {
                    source_path: source.path.clone(),
                    target_path: target.path.clone(),
                    source_type: source.field_type,
                    target_type: target.field_type,
                    transform: m.transform,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            connection_id: connection_id.into(),
            source_type: source_type.into(),
            target_type: target_type.into(),
            mapping_metadata,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.mapping_metadata.is_empty()
    }

    /// Hash of the full request, used to skip re-testing an unchanged set.
    pub fn content_hash(&self) -> Result<String> {
        content_hash(self)
    }
}

/// One mapping in the save payload, with both ids and resolved paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMappingEntry {
    pub id: MappingId,
    pub source_field: FieldId,
    pub target_field: FieldId,
    pub transform: Option<TransformId>,
    pub source_path: String,
    pub target_path: String,
}

/// Body of `POST /api/mappings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMappingsPayload {
    pub connection_id: String,
    pub source_type: String,
    pub target_type: String,
    pub mappings: Vec<SavedMappingEntry>,
}

impl SaveMappingsPayload {
    pub fn build(
        connection_id: impl Into<String>,
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        mappings: &[Mapping],
        source_fields: &[FieldDescriptor],
        target_fields: &[FieldDescriptor],
    ) -> Result<Self> {
        let entries = mappings
            .iter()
            .map(|m| {
                let (source, target) = resolve(m, source_fields, target_fields)?;
                Ok(SavedMappingEntry {
                    id: m.id.clone(),
                    source_field: m.source_field.clone(),
                    target_field: m.target_field.clone(),
                    transform: m.transform,
                    source_path: source.path.clone(),
                    target_path: target.path.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            connection_id: connection_id.into(),
            source_type: source_type.into(),
            target_type: target_type.into(),
            mappings: entries,
        })
    }
}

/// Look up both fields of a mapping.
pub(crate) fn resolve<'a>(
    mapping: &Mapping,
    source_fields: &'a [FieldDescriptor],
    target_fields: &'a [FieldDescriptor],
) -> Result<(&'a FieldDescriptor, &'a FieldDescriptor)> {
    let unknown = |field: &FieldId| MappingError::UnknownField {
        mapping: mapping.id.to_string(),
        field: field.to_string(),
    };
    let source =
        find_field(source_fields, &mapping.source_field).ok_or_else(|| unknown(&mapping.source_field))?;
    let target =
        find_field(target_fields, &mapping.target_field).ok_or_else(|| unknown(&mapping.target_field))?;
    Ok((source, target))
}
