//! Offline preview of a mapping set.
//!
//! Responsibilities:
//! - Read each mapped source value out of a sample document.
//! - Apply the mapping's transform when it can run locally.
//! - Write the result into a fresh target document at the target path.
//!
//! Does NOT handle:
//! - Server-only transforms; the raw value is copied and a note is recorded.
//! - Authoritative results. The remote test endpoint decides what a mapping
//!   really produces; this is a best-effort local rendering.
//!
//! Invariants:
//! - Rendering never fails. Every problem becomes a `PreviewNote`.
//! - A `[]` path segment reads the first array element and writes a
//!   single-element array.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::TransformError;
use crate::field::FieldDescriptor;
use crate::payload::resolve;
use crate::store::{Mapping, MappingId};
use crate::transform::TransformId;

const ARRAY_MARKER: &str = "[]";

/// Rendered target document plus anything worth flagging.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPreview {
    pub target: Value,
    pub notes: Vec<PreviewNote>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewNote {
    /// The mapping points at a field id that is not in the current lists.
    UnresolvedField { mapping: MappingId },
    /// The source path has no value in the sample.
    MissingValue { mapping: MappingId, source_path: String },
    /// The transform only runs remotely; the raw value was copied.
    ServerOnly { mapping: MappingId, transform: TransformId },
    /// The transform rejected the value; the raw value was copied.
    TransformFailed { mapping: MappingId, error: TransformError },
}

impl fmt::Display for PreviewNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewNote::UnresolvedField { mapping } => {
                write!(f, "{mapping}: field no longer exists")
            }
            PreviewNote::MissingValue {
                mapping,
                source_path,
            } => write!(f, "{mapping}: no value at '{source_path}'"),
            PreviewNote::ServerOnly { mapping, transform } => {
                write!(f, "{mapping}: {transform} is applied on the server")
            }
            PreviewNote::TransformFailed { mapping, error } => write!(f, "{mapping}: {error}"),
        }
    }
}

/// Render `source_data` through `mappings` into a new target document.
pub fn render(
    source_data: &Value,
    mappings: &[Mapping],
    source_fields: &[FieldDescriptor],
    target_fields: &[FieldDescriptor],
) -> LocalPreview {
    let mut target = Value::Object(Map::new());
    let mut notes = Vec::new();

    for mapping in mappings {
        let Ok((source, dest)) = resolve(mapping, source_fields, target_fields) else {
            notes.push(PreviewNote::UnresolvedField {
                mapping: mapping.id.clone(),
            });
            continue;
        };

        let Some(raw) = read_path(source_data, &source.path) else {
            notes.push(PreviewNote::MissingValue {
                mapping: mapping.id.clone(),
                source_path: source.path.clone(),
            });
            continue;
        };

        let value = match mapping.transform {
            None => raw.clone(),
            Some(transform) => match transform.apply(raw) {
                Ok(v) => v,
                Err(TransformError::ServerOnly(_)) => {
                    notes.push(PreviewNote::ServerOnly {
                        mapping: mapping.id.clone(),
                        transform,
                    });
                    raw.clone()
                }
                Err(error) => {
                    notes.push(PreviewNote::TransformFailed {
                        mapping: mapping.id.clone(),
                        error,
                    });
                    raw.clone()
                }
            },
        };

        write_path(&mut target, &dest.path, value);
    }

    debug!(
        mappings = mappings.len(),
        notes = notes.len(),
        "Rendered local preview"
    );
    LocalPreview { target, notes }
}

/// Read the value at a dotted field path.
///
/// Non-object roots are addressed by the synthetic `items`/`value` names
/// the extractor gives them.
fn read_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for (index, segment) in path.split('.').enumerate() {
        let (key, into_array) = split_segment(segment);
        current = match current {
            Value::Object(map) => map.get(key)?,
            other if index == 0 && (key == "items" || key == "value") => other,
            _ => return None,
        };
        if into_array {
            current = current.as_array()?.first()?;
        }
    }
    Some(current)
}

fn write_path(document: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = document;

    for (index, segment) in segments.iter().enumerate() {
        let last = index + 1 == segments.len();
        let (key, into_array) = split_segment(segment);

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };

        if last && !into_array {
            map.insert(key.to_string(), value);
            return;
        }

        let slot = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = if into_array {
            if slot.as_array().is_none_or(Vec::is_empty) {
                *slot = Value::Array(vec![Value::Object(Map::new())]);
            }
            let Some(first) = slot.as_array_mut().and_then(|items| items.first_mut()) else {
                return;
            };
            first
        } else {
            slot
        };

        if last {
            *current = value;
            return;
        }
    }
}

fn split_segment(segment: &str) -> (&str, bool) {
    match segment.strip_suffix(ARRAY_MARKER) {
        Some(key) => (key, true),
        None => (segment, false),
    }
}
