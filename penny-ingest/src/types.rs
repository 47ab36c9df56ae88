use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw SMS record as delivered by the message dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Opaque identifier; may arrive as a JSON string or number
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub message: Option<String>,
    /// Calendar date, YYYY-MM-DD
    #[serde(default)]
    pub date: Option<String>,
    /// Bank name or other sender label
    #[serde(default)]
    pub source: Option<String>,
}

impl RawMessage {
    pub fn new(id: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: Some(message.into()),
            date: None,
            source: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The id as a comparable string. Numbers keep their JSON text; anything
    /// that is neither a string nor a number becomes empty.
    pub fn key(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stringifies_numbers() {
        let raw: RawMessage = serde_json::from_str(r#"{"id": 10, "message": "x"}"#).unwrap();
        assert_eq!(raw.key(), "10");

        let raw: RawMessage = serde_json::from_str(r#"{"id": "abc", "message": "x"}"#).unwrap();
        assert_eq!(raw.key(), "abc");
    }

    #[test]
    fn test_missing_or_null_id_is_empty() {
        let raw: RawMessage = serde_json::from_str(r#"{"message": "x"}"#).unwrap();
        assert_eq!(raw.key(), "");

        let raw: RawMessage = serde_json::from_str(r#"{"id": null, "message": "x"}"#).unwrap();
        assert_eq!(raw.key(), "");
    }

    #[test]
    fn test_optional_fields_default() {
        let raw: RawMessage = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(raw.message.is_none());
        assert!(raw.date.is_none());
        assert!(raw.source.is_none());
    }
}
