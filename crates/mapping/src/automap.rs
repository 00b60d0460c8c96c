//! Heuristic auto-mapping.
//!
//! For each unmapped target field, picks the first source field whose name
//! matches it (equal, or substring in either direction, case-insensitive) or
//! whose path ends with the target name. A source field is claimed at most
//! once per pass; when the first match is already claimed the target stays
//! unmapped rather than falling back to a weaker match. When the declared types differ the proposal carries a
//! `parseFloat` transform; that is the only coercion chosen automatically.
//!
//! The result depends on list order: reordering targets changes which
//! sources get claimed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::{FieldDescriptor, FieldId};
use crate::store::Mapping;
use crate::transform::TransformId;

/// A mapping suggested by the auto-mapper, not yet in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingProposal {
    pub source_field: FieldId,
    pub target_field: FieldId,
    pub transform: Option<TransformId>,
}

/// Propose mappings for every target field not covered by `existing`.
pub fn auto_map(
    source_fields: &[FieldDescriptor],
    target_fields: &[FieldDescriptor],
    existing: &[Mapping],
) -> Vec<MappingProposal> {
    let mapped_targets: HashSet<&FieldId> = existing.iter().map(|m| &m.target_field).collect();
    let mut claimed: HashSet<&FieldId> = HashSet::new();
    let mut proposals = Vec::new();

    for target in target_fields {
        if mapped_targets.contains(&target.id) {
            continue;
        }

        let target_name = target.name.to_lowercase();
        let Some(source) = source_fields
            .iter()
            .find(|source| names_match(source, &target_name))
        else {
            continue;
        };

        if !claimed.insert(&source.id) {
            debug!(target = %target.path, source = %source.path, "Best match already claimed");
            continue;
        }

        let transform =
            (source.field_type != target.field_type).then_some(TransformId::ParseFloat);
        proposals.push(MappingProposal {
            source_field: source.id.clone(),
            target_field: target.id.clone(),
            transform,
        });
    }

    debug!(
        proposed = proposals.len(),
        targets = target_fields.len(),
        "Auto-map pass complete"
    );
    proposals
}

fn names_match(source: &FieldDescriptor, target_name: &str) -> bool {
    let source_name = source.name.to_lowercase();
    source_name == target_name
        || source_name.contains(target_name)
        || target_name.contains(source_name.as_str())
        || source.path.to_lowercase().ends_with(target_name)
}
