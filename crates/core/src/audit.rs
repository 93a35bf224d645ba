//! Audit trail vocabulary and field-level change diffs.
//!
//! Every role-level, scorecard and evaluation mutation records one audit
//! entry. Updates also record which fields changed, computed here from flat
//! before/after snapshots of the record.

use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Action names stored in `audit_logs.action`.
pub mod actions {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const EVALUATE: &str = "EVALUATE";

    pub const ALL: &[&str] = &[CREATE, UPDATE, DELETE, EVALUATE];
}

/// Entity names stored in `audit_logs.entity_type`.
pub mod entity_types {
    pub const ROLE_LEVEL: &str = "role_level";
    pub const SCORECARD: &str = "scorecard";
    pub const EVALUATION: &str = "scorecard_evaluation";
}

/// Record fields never worth diffing.
pub const IGNORED_FIELDS: &[&str] = &["id", "company_id", "deleted", "created", "modified"];

/// One-line summary such as `"Updated role level: Lead"`.
pub fn describe(action: &str, entity_type: &str, entity_name: &str) -> String {
    let noun = match entity_type {
        entity_types::ROLE_LEVEL => "role level",
        entity_types::EVALUATION => "evaluation",
        other => other,
    };
    match action {
        actions::CREATE => format!("Created {noun}: {entity_name}"),
        actions::UPDATE => format!("Updated {noun}: {entity_name}"),
        actions::DELETE => format!("Deleted {noun}: {entity_name}"),
        actions::EVALUATE => format!("Evaluated {noun}: {entity_name}"),
        other => format!("Performed {other} on {noun}: {entity_name}"),
    }
}

// ---------------------------------------------------------------------------
// Field changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Changed,
    Removed,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Changed => "changed",
            ChangeType::Removed => "removed",
        }
    }
}

/// A single changed field. Values are rendered to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field_name: String,
    pub field_label: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: ChangeType,
}

/// Flatten a record snapshot into dotted paths (`answers.level_info.rank`).
///
/// Arrays stay whole. Top-level keys in [`IGNORED_FIELDS`] are dropped.
pub fn flatten(value: &Value) -> Map<String, Value> {
    fn walk(prefix: &str, value: &Value, out: &mut Map<String, Value>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    walk(&path, child, out);
                }
            }
            other => {
                out.insert(prefix.to_string(), other.clone());
            }
        }
    }

    let mut out = Map::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            if !IGNORED_FIELDS.contains(&key.as_str()) {
                walk(key, child, &mut out);
            }
        }
    }
    out
}

/// Text form of a value, with null, blank strings and empty containers all
/// reading as `None`.
fn render(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// `level_info.level_name` -> `Level name`.
fn label_for(path: &str) -> String {
    let leaf = path.rsplit('.').next().unwrap_or(path).replace('_', " ");
    let mut chars = leaf.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fields whose rendered value differs between two flat snapshots.
///
/// Fields present only in `old` are reported as removed unless their old
/// value was already empty.
pub fn field_changes(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for (key, new_value) in new {
        let old_value = render(old.get(key));
        let new_value = render(Some(new_value));
        if old_value == new_value {
            continue;
        }
        let change_type = if old_value.is_none() {
            ChangeType::Added
        } else {
            ChangeType::Changed
        };
        changes.push(FieldChange {
            field_name: key.clone(),
            field_label: label_for(key),
            old_value,
            new_value,
            change_type,
        });
    }

    for (key, old_value) in old {
        if new.contains_key(key) {
            continue;
        }
        if let Some(old_value) = render(Some(old_value)) {
            changes.push(FieldChange {
                field_name: key.clone(),
                field_label: label_for(key),
                old_value: Some(old_value),
                new_value: None,
                change_type: ChangeType::Removed,
            });
        }
    }

    changes
}
