//! Connection models for the Tower connections API.
//!
//! Secret config values arrive in clear text; `Display` and [`Connection::masked`]
//! replace them with [`SECRET_MASK`] so they never reach logs or terminal output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Replacement shown for secret config values.
pub const SECRET_MASK: &str = "********";

/// One key/value setting of a connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub secret: bool,
}

impl ConfigEntry {
    /// The value as it may be shown to a user.
    pub fn display_value(&self) -> &str {
        if self.secret { SECRET_MASK } else { &self.value }
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("key", &self.key)
            .field("value", &self.display_value())
            .field("secret", &self.secret)
            .finish()
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.display_value())
    }
}

/// A configured integration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub config: Vec<ConfigEntry>,
}

impl Connection {
    /// Copy with every secret value replaced by [`SECRET_MASK`].
    pub fn masked(&self) -> Connection {
        Connection {
            config: self
                .config
                .iter()
                .map(|entry| ConfigEntry {
                    value: entry.display_value().to_string(),
                    ..entry.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.id, self.connection_type)?;
        if let Some(status) = &self.status {
            write!(f, " [{status}]")?;
        }
        for entry in &self.config {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}

/// Body of `PATCH /api/connections/{id}`. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Vec<ConfigEntry>>,
}

/// A kind of connection the server supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shopify() -> Connection {
        serde_json::from_str(
            r#"{
                "id": "c1",
                "name": "Main store",
                "type": "shopify",
                "status": "active",
                "config": [
                    {"key": "shop", "value": "acme"},
                    {"key": "apiKey", "value": "sk_live_123", "secret": true}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_connection() {
        let conn = shopify();
        assert_eq!(conn.connection_type, "shopify");
        assert_eq!(conn.status.as_deref(), Some("active"));
        assert!(!conn.config[0].secret);
        assert!(conn.config[1].secret);
    }

    #[test]
    fn test_masked_hides_only_secrets() {
        let masked = shopify().masked();
        assert_eq!(masked.config[0].value, "acme");
        assert_eq!(masked.config[1].value, SECRET_MASK);
    }

    #[test]
    fn test_display_and_debug_never_show_secret() {
        let conn = shopify();
        let display = conn.to_string();
        let debug = format!("{conn:?}");
        assert!(display.contains("shop=acme"));
        assert!(display.contains("apiKey=********"));
        assert!(!display.contains("sk_live_123"));
        assert!(!debug.contains("sk_live_123"));
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = ConnectionUpdate {
            name: Some("Renamed".to_string()),
            config: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"name": "Renamed"})
        );
    }
}
