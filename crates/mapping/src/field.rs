//! Field descriptor types.
//!
//! Responsibilities:
//! - Define the typed shape of one flattened JSON leaf (`FieldDescriptor`).
//! - Define the field type sum type and its wire form (`string`, `array.number`, ...).
//!
//! Does NOT handle:
//! - Walking JSON documents (see `extract`).
//!
//! Invariants:
//! - `FieldType` round-trips through its string form; unknown strings are rejected
//!   at deserialization time instead of flowing through as free-form text.
//! - Field ids carry the side prefix (`s` / `t`) of the extraction that produced them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;

/// Which side of a mapping a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    /// Prefix used for field ids produced on this side.
    pub const fn id_prefix(&self) -> char {
        match self {
            Side::Source => 's',
            Side::Target => 't',
        }
    }
}

impl FromStr for Side {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "source" => Ok(Side::Source),
            "target" => Ok(Side::Target),
            other => Err(MappingError::InvalidFieldType(format!("unknown side '{other}'"))),
        }
    }
}

/// Element type of a primitive array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

/// Type of a flattened field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    /// Array of objects, or an array whose element type is not a primitive.
    Array,
    /// Array whose first element is a primitive.
    ArrayOf(Primitive),
}

impl FieldType {
    /// Type of a primitive JSON value, `None` for null, arrays and objects.
    pub fn of_primitive(value: &serde_json::Value) -> Option<Primitive> {
        match value {
            serde_json::Value::String(_) => Some(Primitive::String),
            serde_json::Value::Number(_) => Some(Primitive::Number),
            serde_json::Value::Bool(_) => Some(Primitive::Boolean),
            _ => None,
        }
    }
}

impl From<Primitive> for FieldType {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::String => FieldType::String,
            Primitive::Number => FieldType::Number,
            Primitive::Boolean => FieldType::Boolean,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Number => f.write_str("number"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Object => f.write_str("object"),
            FieldType::Array => f.write_str("array"),
            FieldType::ArrayOf(p) => write!(f, "array.{}", p.as_str()),
        }
    }
}

impl FromStr for FieldType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            "array.string" => FieldType::ArrayOf(Primitive::String),
            "array.number" => FieldType::ArrayOf(Primitive::Number),
            "array.boolean" => FieldType::ArrayOf(Primitive::Boolean),
            other => return Err(MappingError::InvalidFieldType(other.to_string())),
        };
        Ok(parsed)
    }
}

impl TryFrom<String> for FieldType {
    type Error = MappingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

/// Identifier of a field within one extraction session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(side: Side, seq: u64) -> Self {
        Self(format!("{}{}", side.id_prefix(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One flattened field of a source or target document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Dotted path; array segments carry a `[]` suffix.
    pub path: String,
    /// Truncated preview of the sample value.
    pub sample: String,
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Returns true when both descriptors describe the same field shape,
    /// ignoring the session-scoped id.
    pub fn same_shape(&self, other: &FieldDescriptor) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.path == other.path
            && self.sample == other.sample
            && self.required == other.required
    }
}

/// Look up a field by id.
pub fn find_field<'a>(fields: &'a [FieldDescriptor], id: &FieldId) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|f| &f.id == id)
}

/// Look up a field by path.
pub fn find_by_path<'a>(fields: &'a [FieldDescriptor], path: &str) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|f| f.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_display_round_trip() {
        for ty in [
            FieldType::String,
            FieldType::Number,
            FieldType::Boolean,
            FieldType::Object,
            FieldType::Array,
            FieldType::ArrayOf(Primitive::Number),
            FieldType::ArrayOf(Primitive::String),
        ] {
            assert_eq!(ty.to_string().parse::<FieldType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_field_type_rejects_unknown() {
        let err = "array.object".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, MappingError::InvalidFieldType(_)));
    }

    #[test]
    fn test_descriptor_deserializes_wire_shape() {
        let json = r#"{"id":"t1","name":"price","type":"number","path":"price","sample":"9.5","required":true}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.required);
        assert_eq!(field.id.as_str(), "t1");
    }

    #[test]
    fn test_descriptor_with_bad_type_fails_at_boundary() {
        let json = r#"{"id":"t1","name":"price","type":"decimal","path":"price","sample":""}"#;
        assert!(serde_json::from_str::<FieldDescriptor>(json).is_err());
    }

    #[test]
    fn test_field_id_prefix() {
        assert_eq!(FieldId::new(Side::Source, 3).as_str(), "s3");
        assert_eq!(FieldId::new(Side::Target, 12).as_str(), "t12");
    }
}
