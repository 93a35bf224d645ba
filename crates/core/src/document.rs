//! Structured JSON payloads: role-level `answers` and opaque `data` blobs.
//!
//! Clients send these either as JSON objects or as strings containing JSON
//! (form posts cannot nest). Both forms are normalized here, and malformed
//! content is rejected with a specific [`DocumentError`].

use serde_json::{Map, Value};

use crate::coerce::is_blank;
use crate::sanitize::{escape_html, escape_json_strings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("value is required")]
    Missing,
    #[error("value is not valid JSON")]
    InvalidJson,
    #[error("value must be a JSON object")]
    NotAnObject,
    #[error("group '{0}' must be an object of field values")]
    GroupNotObject(String),
    #[error("the '{0}' group is required")]
    MissingGroup(String),
    #[error("field '{0}' is required")]
    RequiredField(String),
}

/// Decode a value that may be a JSON-encoded string.
fn decode(value: Option<&Value>) -> Result<Value, DocumentError> {
    if is_blank(value) {
        return Err(DocumentError::Missing);
    }
    match value {
        Some(Value::String(s)) => {
            serde_json::from_str(s.trim()).map_err(|_| DocumentError::InvalidJson)
        }
        Some(other) => Ok(other.clone()),
        None => Err(DocumentError::Missing),
    }
}

/// Parse an optional opaque blob (`data`, `evaluation_data`).
///
/// Absent or blank input yields `Ok(None)`. Present input must be a JSON
/// object or array (directly or JSON-encoded). String leaves are escaped.
pub fn parse_blob(value: Option<&Value>) -> Result<Option<Value>, DocumentError> {
    match decode(value) {
        Err(DocumentError::Missing) => Ok(None),
        Err(e) => Err(e),
        Ok(v @ (Value::Object(_) | Value::Array(_))) => Ok(Some(escape_json_strings(v))),
        Ok(_) => Err(DocumentError::NotAnObject),
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// A validated answers document: an object of groups, each an object of
/// field values, with every key and string leaf HTML-escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswersDocument {
    groups: Map<String, Value>,
}

impl AnswersDocument {
    /// Parse and validate answers, requiring `required_group` to be present.
    pub fn parse(value: Option<&Value>, required_group: &str) -> Result<Self, DocumentError> {
        let Value::Object(groups) = decode(value)? else {
            return Err(DocumentError::NotAnObject);
        };
        if let Some((name, _)) = groups.iter().find(|(_, v)| !v.is_object()) {
            return Err(DocumentError::GroupNotObject(escape_html(name)));
        }
        if !groups.contains_key(required_group) {
            return Err(DocumentError::MissingGroup(required_group.to_string()));
        }
        let groups = groups
            .into_iter()
            .map(|(name, fields)| (escape_html(&name), escape_json_strings(fields)))
            .collect();
        Ok(Self { groups })
    }

    /// Wrap an already-stored document without re-validating it.
    pub fn from_stored(value: &Value) -> Self {
        let groups = value.as_object().cloned().unwrap_or_default();
        Self { groups }
    }

    pub fn group(&self, group: &str) -> Option<&Map<String, Value>> {
        self.groups.get(group).and_then(Value::as_object)
    }

    /// Value of `field` inside `group`.
    pub fn field(&self, group: &str, field: &str) -> Option<&Value> {
        self.group(group).and_then(|g| g.get(field))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.groups)
    }
}
