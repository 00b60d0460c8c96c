//! Transform catalog.
//!
//! Responsibilities:
//! - Define the closed set of value transforms a mapping can carry.
//! - Provide display metadata for transform pickers.
//! - Execute the basic transforms locally for offline previews.
//!
//! Does NOT handle:
//! - Parameterised transforms (`concat`, `conditional`, `formatDate`); those need
//!   arguments the catalog does not carry and only run on the server.
//!
//! Invariants:
//! - The wire id of every transform is stable and matches the remote API.
//! - `null` passes through every executable transform unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{MappingError, TransformError};

/// Identifier of a catalog transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformId {
    #[serde(rename = "parseFloat")]
    ParseFloat,
    #[serde(rename = "parseInt")]
    ParseInt,
    #[serde(rename = "toString")]
    ToString,
    #[serde(rename = "trim")]
    Trim,
    #[serde(rename = "toUpperCase")]
    ToUpperCase,
    #[serde(rename = "toLowerCase")]
    ToLowerCase,
    #[serde(rename = "round")]
    Round,
    #[serde(rename = "split")]
    Split,
    #[serde(rename = "concat")]
    Concat,
    #[serde(rename = "conditional")]
    Conditional,
    #[serde(rename = "formatDate")]
    FormatDate,
}

/// Catalog metadata for one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformInfo {
    pub id: TransformId,
    pub name: &'static str,
    pub description: &'static str,
    pub advanced: bool,
}

static CATALOG: [TransformInfo; 11] = [
    TransformInfo {
        id: TransformId::ParseFloat,
        name: "Parse Number",
        description: "Convert text to a decimal number",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::ParseInt,
        name: "Parse Integer",
        description: "Convert text to a whole number",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::ToString,
        name: "To Text",
        description: "Convert any value to text",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::Trim,
        name: "Trim",
        description: "Remove leading and trailing whitespace",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::ToUpperCase,
        name: "Uppercase",
        description: "Convert text to upper case",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::ToLowerCase,
        name: "Lowercase",
        description: "Convert text to lower case",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::Round,
        name: "Round",
        description: "Round a number to the nearest integer",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::Split,
        name: "Split (first)",
        description: "Split text on commas and keep the first part",
        advanced: false,
    },
    TransformInfo {
        id: TransformId::Concat,
        name: "Concatenate",
        description: "Join several source values into one",
        advanced: true,
    },
    TransformInfo {
        id: TransformId::Conditional,
        name: "Conditional",
        description: "Choose a value based on a condition",
        advanced: true,
    },
    TransformInfo {
        id: TransformId::FormatDate,
        name: "Format Date",
        description: "Reformat a date string",
        advanced: true,
    },
];

/// The full transform catalog, in display order.
pub fn catalog() -> &'static [TransformInfo] {
    &CATALOG
}

/// Catalog entry for a wire id, if it names a known transform.
pub fn lookup(id: &str) -> Option<&'static TransformInfo> {
    CATALOG.iter().find(|t| t.id.as_str() == id)
}

/// Transforms shown in the basic picker.
pub fn basic() -> impl Iterator<Item = &'static TransformInfo> {
    CATALOG.iter().filter(|t| !t.advanced)
}

/// Transforms shown in the advanced picker.
pub fn advanced() -> impl Iterator<Item = &'static TransformInfo> {
    CATALOG.iter().filter(|t| t.advanced)
}

impl TransformId {
    /// Wire id used by the remote API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransformId::ParseFloat => "parseFloat",
            TransformId::ParseInt => "parseInt",
            TransformId::ToString => "toString",
            TransformId::Trim => "trim",
            TransformId::ToUpperCase => "toUpperCase",
            TransformId::ToLowerCase => "toLowerCase",
            TransformId::Round => "round",
            TransformId::Split => "split",
            TransformId::Concat => "concat",
            TransformId::Conditional => "conditional",
            TransformId::FormatDate => "formatDate",
        }
    }

    /// Catalog entry for this transform.
    pub fn info(&self) -> &'static TransformInfo {
        // every variant has exactly one catalog row
        CATALOG
            .iter()
            .find(|t| t.id == *self)
            .unwrap_or(&CATALOG[0])
    }

    pub fn is_advanced(&self) -> bool {
        self.info().advanced
    }

    /// Apply the transform to a single value.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ServerOnly`] for advanced transforms and
    /// [`TransformError::Unconvertible`] when the value has the wrong shape.
    pub fn apply(&self, value: &Value) -> Result<Value, TransformError> {
        if self.is_advanced() {
            return Err(TransformError::ServerOnly(self.as_str().to_string()));
        }
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self {
            TransformId::ParseFloat => self.number_from(value).and_then(|n| self.float(n)),
            TransformId::ParseInt => self
                .number_from(value)
                .map(|n| Value::Number(Number::from(n.trunc() as i64))),
            TransformId::Round => self
                .number_from(value)
                .map(|n| Value::Number(Number::from(n.round() as i64))),
            TransformId::ToString => Ok(Value::String(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            TransformId::Trim => self.text(value).map(|s| Value::String(s.trim().to_string())),
            TransformId::ToUpperCase => self.text(value).map(|s| Value::String(s.to_uppercase())),
            TransformId::ToLowerCase => self.text(value).map(|s| Value::String(s.to_lowercase())),
            TransformId::Split => self.text(value).map(|s| {
                let first = s.split(',').next().unwrap_or_default();
                Value::String(first.trim().to_string())
            }),
            TransformId::Concat | TransformId::Conditional | TransformId::FormatDate => {
                Err(TransformError::ServerOnly(self.as_str().to_string()))
            }
        }
    }

    fn unconvertible(&self, value: &Value) -> TransformError {
        TransformError::Unconvertible {
            transform: self.as_str().to_string(),
            value: value.to_string(),
        }
    }

    fn number_from(&self, value: &Value) -> Result<f64, TransformError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let text = s.trim_start();
                let prefix = numeric_prefix(text, *self != TransformId::ParseInt);
                text[..prefix].parse::<f64>().ok()
            }
            _ => None,
        };
        parsed
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.unconvertible(value))
    }

    fn float(&self, n: f64) -> Result<Value, TransformError> {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            return Ok(Value::Number(Number::from(n as i64)));
        }
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| self.unconvertible(&Value::String(n.to_string())))
    }

    fn text<'a>(&self, value: &'a Value) -> Result<&'a str, TransformError> {
        value.as_str().ok_or_else(|| self.unconvertible(value))
    }
}

/// Byte length of the leading number in `text`, `0` when there is none.
///
/// Trailing text is ignored, so `"12.5kg"` reads as `12.5`. With
/// `fraction` off only an integer is taken, so `"12.9"` reads as `12`.
fn numeric_prefix(text: &str, fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start.min(bytes.len())..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = digits_from(start);
    let mut has_digits = end > start;

    if fraction && bytes.get(end) == Some(&b'.') {
        let after = digits_from(end + 1);
        if has_digits || after > end + 1 {
            has_digits = true;
            end = after;
        }
    }
    if !has_digits {
        return 0;
    }

    if fraction && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > end + 1 + sign {
            end = exponent;
        }
    }
    end
}

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformId {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|t| t.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| MappingError::UnknownTransform(s.to_string()))
    }
}
