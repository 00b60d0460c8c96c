//! Mapping store with snapshot undo.
//!
//! Responsibilities:
//! - Hold the live, ordered list of source-to-target mappings.
//! - Record a full snapshot before every mutation so edits can be undone.
//! - Allocate mapping ids.
//!
//! Does NOT handle:
//! - Proposing mappings (see `automap`).
//! - Persisting mappings remotely (see `payload` and `tower-client`).
//!
//! Invariants:
//! - At most one mapping references a given target field.
//! - Every mutating call pushes a snapshot first, even when the change turns out to be a no-op.
//! - Mapping ids come from a monotonic counter and are never reused, including after
//!   remove, clear or undo.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::automap::MappingProposal;
use crate::field::FieldId;
use crate::transform::TransformId;

/// Identifier of a mapping, `m<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingId(String);

impl MappingId {
    fn from_seq(seq: u64) -> Self {
        Self(format!("m{seq}"))
    }

    /// Numeric suffix, if this id follows the `m<n>` scheme.
    fn seq(&self) -> Option<u64> {
        self.0.strip_prefix('m').and_then(|n| n.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MappingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Association from one source field to one target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub id: MappingId,
    pub source_field: FieldId,
    pub target_field: FieldId,
    pub transform: Option<TransformId>,
}

/// Live mapping list plus its undo history.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    mappings: Vec<Mapping>,
    history: Vec<Vec<Mapping>>,
    last_seq: u64,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, id: &MappingId) -> Option<&Mapping> {
        self.mappings.iter().find(|m| &m.id == id)
    }

    /// Mapping that currently feeds the given target field.
    pub fn for_target(&self, target: &FieldId) -> Option<&Mapping> {
        self.mappings.iter().find(|m| &m.target_field == target)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Map `source` onto `target`.
    ///
    /// If `target` is already mapped, its source is replaced in place: the
    /// mapping keeps its id and its transform is reset. Otherwise a new
    /// mapping is appended. Returns the id of the affected mapping.
    pub fn add(&mut self, source: FieldId, target: FieldId) -> MappingId {
        self.snapshot();
        self.upsert(source, target, None)
    }

    /// Delete a mapping. Unknown ids leave the list unchanged.
    pub fn remove(&mut self, id: &MappingId) -> bool {
        self.snapshot();
        let before = self.mappings.len();
        self.mappings.retain(|m| &m.id != id);
        before != self.mappings.len()
    }

    /// Assign or clear the transform of a mapping. Unknown ids leave the list unchanged.
    pub fn set_transform(&mut self, id: &MappingId, transform: Option<TransformId>) -> bool {
        self.snapshot();
        match self.mappings.iter_mut().find(|m| &m.id == id) {
            Some(mapping) => {
                mapping.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Restore the list as it was before the most recent mutation.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                trace!(remaining = self.history.len(), "Undoing mapping change");
                self.mappings = previous;
                true
            }
            None => false,
        }
    }

    /// Apply a batch of proposals as a single undoable step.
    pub fn apply_proposals(&mut self, proposals: Vec<MappingProposal>) -> Vec<MappingId> {
        self.snapshot();
        proposals
            .into_iter()
            .map(|p| self.upsert(p.source_field, p.target_field, p.transform))
            .collect()
    }

    /// Replace the whole list, e.g. with mappings loaded from the server.
    ///
    /// The id counter moves past every loaded id so new mappings cannot collide.
    pub fn replace_all(&mut self, mappings: Vec<Mapping>) {
        self.snapshot();
        let loaded_max = mappings.iter().filter_map(|m| m.id.seq()).max();
        if let Some(max) = loaded_max {
            self.last_seq = self.last_seq.max(max);
        }
        self.mappings = mappings;
    }

    /// Remove every mapping as a single undoable step.
    pub fn clear(&mut self) {
        self.snapshot();
        self.mappings.clear();
    }

    fn snapshot(&mut self) {
        self.history.push(self.mappings.clone());
    }

    fn upsert(
        &mut self,
        source: FieldId,
        target: FieldId,
        transform: Option<TransformId>,
    ) -> MappingId {
        if let Some(existing) = self.mappings.iter_mut().find(|m| m.target_field == target) {
            existing.source_field = source;
            existing.transform = transform;
            return existing.id.clone();
        }

        self.last_seq += 1;
        let id = MappingId::from_seq(self.last_seq);
        self.mappings.push(Mapping {
            id: id.clone(),
            source_field: source,
            target_field: target,
            transform,
        });
        id
    }
}
