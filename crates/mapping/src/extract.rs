//! Schema field extraction.
//!
//! Responsibilities:
//! - Walk an arbitrary JSON sample document and flatten it into `FieldDescriptor`s.
//! - Infer field types from runtime values and build truncated sample previews.
//! - Flag conventional required keys on the target side.
//!
//! Does NOT handle:
//! - Fetching sample documents (see `tower-client`).
//! - Merging field lists across documents; every extraction is a fresh snapshot.
//!
//! Invariants:
//! - `null` values never produce a descriptor.
//! - Only the first element of an array is inspected.
//! - Nesting deeper than `max_depth` fails the whole extraction; no partial list is returned.
//! - Field ids come from a counter owned by the extractor and never repeat within its lifetime.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MappingError, Result};
use crate::field::{FieldDescriptor, FieldId, FieldType, Side};

/// Default maximum nesting depth for extraction.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Maximum number of characters kept in a sample preview.
pub const MAX_SAMPLE_CHARS: usize = 50;

/// Objects with at most this many keys get a full JSON sample.
const INLINE_OBJECT_KEYS: usize = 3;

/// Sample used for objects too large to preview inline.
const OBJECT_PLACEHOLDER: &str = "{...}";

/// Target keys treated as required.
pub const REQUIRED_TARGET_KEYS: &[&str] = &["id", "sku", "name", "price", "code", "description"];

/// Flattens JSON documents into field descriptors for one mapping side.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    side: Side,
    max_depth: usize,
    next_seq: u64,
}

impl FieldExtractor {
    /// Create an extractor for the given side with the default depth cap.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            max_depth: DEFAULT_MAX_DEPTH,
            next_seq: 1,
        }
    }

    /// Override the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Extract a flat field list from a sample document.
    ///
    /// Object roots are walked key by key. An array root is treated as a
    /// field named `items`, and a primitive root as a field named `value`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::DepthExceeded`] if the document nests deeper
    /// than the configured maximum.
    pub fn extract(&mut self, document: &Value) -> Result<Vec<FieldDescriptor>> {
        let mut fields = Vec::new();
        match document {
            Value::Object(map) => self.walk_object(map, "", 0, &mut fields)?,
            Value::Null => {}
            other => {
                let name = if other.is_array() { "items" } else { "value" };
                self.visit(name, other, "", 0, &mut fields)?;
            }
        }

        debug!(
            side = ?self.side,
            count = fields.len(),
            "Extracted fields from sample document"
        );
        Ok(fields)
    }

    fn walk_object(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        depth: usize,
        out: &mut Vec<FieldDescriptor>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(MappingError::DepthExceeded {
                path: prefix.to_string(),
                max_depth: self.max_depth,
            });
        }

        for (key, value) in map {
            self.visit(key, value, prefix, depth, out)?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        key: &str,
        value: &Value,
        prefix: &str,
        depth: usize,
        out: &mut Vec<FieldDescriptor>,
    ) -> Result<()> {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Null => {}
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                // of_primitive is total over these three variants
                if let Some(primitive) = FieldType::of_primitive(value) {
                    let descriptor =
                        self.descriptor(key, primitive.into(), path, scalar_text(value));
                    out.push(descriptor);
                }
            }
            Value::Array(items) => match items.first() {
                None => {
                    let descriptor = self.descriptor(key, FieldType::Array, path, "[]".to_string());
                    out.push(descriptor);
                }
                Some(Value::Object(element)) => {
                    let sample = json_sample(&Value::Array(vec![Value::Object(element.clone())]));
                    let element_prefix = format!("{path}[]");
                    out.push(self.descriptor(key, FieldType::Array, path, sample));
                    self.walk_object(element, &element_prefix, depth + 1, out)?;
                }
                Some(first) => {
                    let field_type = FieldType::of_primitive(first)
                        .map(FieldType::ArrayOf)
                        .unwrap_or(FieldType::Array);
                    let sample = json_sample(&Value::Array(vec![first.clone()]));
                    out.push(self.descriptor(key, field_type, path, sample));
                }
            },
            Value::Object(map) => {
                let sample = if map.len() <= INLINE_OBJECT_KEYS {
                    json_sample(value)
                } else {
                    OBJECT_PLACEHOLDER.to_string()
                };
                let child_prefix = path.clone();
                out.push(self.descriptor(key, FieldType::Object, path, sample));
                self.walk_object(map, &child_prefix, depth + 1, out)?;
            }
        }
        Ok(())
    }

    fn descriptor(
        &mut self,
        name: &str,
        field_type: FieldType,
        path: String,
        sample: String,
    ) -> FieldDescriptor {
        let id = FieldId::new(self.side, self.next_seq);
        self.next_seq += 1;
        FieldDescriptor {
            id,
            name: name.to_string(),
            field_type,
            path,
            sample: truncate_sample(sample),
            required: self.side == Side::Target && is_required_key(name),
        }
    }
}

/// Extract source and target field lists in one call.
pub fn extract_pair(
    source: &Value,
    target: &Value,
    max_depth: usize,
) -> Result<(Vec<FieldDescriptor>, Vec<FieldDescriptor>)> {
    let source_fields = FieldExtractor::new(Side::Source)
        .with_max_depth(max_depth)
        .extract(source)?;
    let target_fields = FieldExtractor::new(Side::Target)
        .with_max_depth(max_depth)
        .extract(target)?;
    Ok((source_fields, target_fields))
}

fn is_required_key(name: &str) -> bool {
    REQUIRED_TARGET_KEYS
        .iter()
        .any(|key| key.eq_ignore_ascii_case(name))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_sample(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn truncate_sample(sample: String) -> String {
    if sample.chars().count() <= MAX_SAMPLE_CHARS {
        return sample;
    }
    let mut cut: String = sample.chars().take(MAX_SAMPLE_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Primitive;
    use serde_json::json;

    fn paths(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_primitive_leaves() {
        let doc = json!({"name": "Widget", "price": 9.5, "active": true});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();

        assert_eq!(paths(&fields), vec!["name", "price", "active"]);
        assert_eq!(fields[0].field_type, FieldType::String);
        assert_eq!(fields[0].sample, "Widget");
        assert_eq!(fields[1].field_type, FieldType::Number);
        assert_eq!(fields[1].sample, "9.5");
        assert_eq!(fields[2].field_type, FieldType::Boolean);
    }

    #[test]
    fn test_null_values_are_skipped() {
        let doc = json!({"a": null, "b": 1});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(paths(&fields), vec!["b"]);
    }

    #[test]
    fn test_empty_array_has_placeholder_sample() {
        let doc = json!({"tags": []});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Array);
        assert_eq!(fields[0].sample, "[]");
    }

    #[test]
    fn test_primitive_array_uses_first_element() {
        let doc = json!({"tags": ["red", "blue"]});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(fields[0].field_type, FieldType::ArrayOf(Primitive::String));
        assert_eq!(fields[0].sample, r#"["red"]"#);
    }

    #[test]
    fn test_object_array_recurses_with_suffix() {
        let doc = json!({"items": [{"sku": "A1", "qty": 2}, {"sku": "B2"}]});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(paths(&fields), vec!["items", "items[].sku", "items[].qty"]);
    }

    #[test]
    fn test_small_object_gets_inline_sample() {
        let doc = json!({"dims": {"w": 1, "h": 2}});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Object);
        assert_eq!(fields[0].sample, r#"{"w":1,"h":2}"#);
        assert_eq!(paths(&fields), vec!["dims", "dims.w", "dims.h"]);
    }

    #[test]
    fn test_large_object_gets_placeholder() {
        let doc = json!({"meta": {"a": 1, "b": 2, "c": 3, "d": 4}});
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(fields[0].sample, "{...}");
    }

    #[test]
    fn test_required_only_on_target_side() {
        let doc = json!({"sku": "A1", "color": "red"});
        let source = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        let target = FieldExtractor::new(Side::Target).extract(&doc).unwrap();

        assert!(source.iter().all(|f| !f.required));
        assert!(target[0].required);
        assert!(!target[1].required);
    }

    #[test]
    fn test_long_sample_is_truncated() {
        let long = "x".repeat(80);
        let doc = json!({ "note": long });
        let fields = FieldExtractor::new(Side::Source).extract(&doc).unwrap();
        assert_eq!(fields[0].sample.chars().count(), MAX_SAMPLE_CHARS + 3);
        assert!(fields[0].sample.ends_with("..."));
    }

    #[test]
    fn test_depth_cap_fails_closed() {
        let doc = json!({"a": {"b": {"c": {"d": 1}}}});
        let result = FieldExtractor::new(Side::Source)
            .with_max_depth(2)
            .extract(&doc);
        assert!(matches!(
            result,
            Err(MappingError::DepthExceeded { max_depth: 2, .. })
        ));
    }

    #[test]
    fn test_depth_within_cap_succeeds() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let fields = FieldExtractor::new(Side::Source)
            .with_max_depth(2)
            .extract(&doc)
            .unwrap();
        assert_eq!(paths(&fields), vec!["a", "a.b", "a.b.c"]);
    }

    #[test]
    fn test_ids_are_sequential_and_prefixed() {
        let doc = json!({"a": 1, "b": 2});
        let fields = FieldExtractor::new(Side::Target).extract(&doc).unwrap();
        assert_eq!(fields[0].id.as_str(), "t1");
        assert_eq!(fields[1].id.as_str(), "t2");
    }

    #[test]
    fn test_re_extraction_keeps_shape_but_not_ids() {
        let doc = json!({"a": 1, "b": {"c": "x"}});
        let mut extractor = FieldExtractor::new(Side::Source);
        let first = extractor.extract(&doc).unwrap();
        let second = extractor.extract(&doc).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(a.same_shape(b));
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_primitive_and_array_roots() {
        let fields = FieldExtractor::new(Side::Source)
            .extract(&json!(42))
            .unwrap();
        assert_eq!(paths(&fields), vec!["value"]);

        let fields = FieldExtractor::new(Side::Source)
            .extract(&json!([{"id": 1}]))
            .unwrap();
        assert_eq!(paths(&fields), vec!["items", "items[].id"]);
    }
}
