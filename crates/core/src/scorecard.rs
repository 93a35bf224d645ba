//! Scorecard rules: status allow-list, table headers and child batches.

use std::collections::HashSet;

use serde_json::Value;

use crate::coerce::as_text;
use crate::error::CoreError;
use crate::messages;
use crate::template::{TableHeader, TemplateStructure, SCORECARD_INFO_GROUP};
use crate::unique_id::is_valid_unique_id;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ARCHIVED: &str = "archived";

/// Accepted statuses. Matching is exact: `"Active"` is rejected.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ACTIVE, STATUS_COMPLETED, STATUS_ARCHIVED];

/// The rejected value is not echoed back.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Sort fields accepted by scorecard lists, mapped to columns.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("created", "created"),
    ("modified", "modified"),
    ("title", "title"),
    ("status", "status"),
    ("scorecard_unique_id", "scorecard_unique_id"),
    ("period_start", "period_start"),
    ("period_end", "period_end"),
];

pub const DEFAULT_SORT: &str = "created";

/// Fixed columns every scorecard table shows.
const BASE_HEADERS: &[(&str, &str)] = &[
    ("scorecard_unique_id", "Scorecard ID"),
    ("title", "Title"),
    ("employee_id", "Employee"),
    ("status", "Status"),
    ("period_start", "Period Start"),
    ("period_end", "Period End"),
];

/// Base columns followed by the template's `scorecard_info` fields.
pub fn table_headers(structure: Option<&TemplateStructure>) -> Vec<TableHeader> {
    let mut headers: Vec<TableHeader> = BASE_HEADERS
        .iter()
        .map(|(id, label)| TableHeader::new(*id, *label))
        .collect();

    if let Some(structure) = structure {
        let template_fields = structure
            .groups
            .iter()
            .filter(|g| g.id == SCORECARD_INFO_GROUP)
            .flat_map(|g| g.fields.iter())
            .filter(|f| !headers.iter().any(|h| h.id == f.id))
            .map(|f| TableHeader::new(f.id.clone(), f.display_label()))
            .collect::<Vec<_>>();
        headers.extend(template_fields);
    }
    headers
}

// ---------------------------------------------------------------------------
// Child batches
// ---------------------------------------------------------------------------

/// Largest number of children one request may create.
pub const MAX_CHILD_BATCH: usize = 100;

/// Read `child_employee_ids` given as an array, a JSON-encoded array, or a
/// comma-separated string. Blank entries are kept so validation can reject
/// them.
pub fn parse_child_ids(value: Option<&Value>) -> Result<Vec<String>, CoreError> {
    let required = || CoreError::validation(messages::CHILD_IDS_REQUIRED);
    let items = match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) if s.trim_start().starts_with('[') => {
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items,
                _ => return Err(required()),
            }
        }
        Some(Value::String(s)) if !s.trim().is_empty() => {
            s.split(',').map(|p| Value::String(p.to_string())).collect()
        }
        _ => return Err(required()),
    };
    Ok(items
        .iter()
        .map(|v| as_text(v).unwrap_or_default())
        .collect())
}

/// Validate a whole child batch before anything is written.
///
/// Fails on an empty or oversized list, a syntactically invalid id, a
/// duplicate id, or an id equal to the parent scorecard id or the parent's
/// own employee.
pub fn validate_child_batch(
    parent_unique_id: &str,
    parent_employee_id: &str,
    child_ids: &[String],
) -> Result<(), CoreError> {
    if child_ids.is_empty() {
        return Err(CoreError::validation(messages::CHILD_IDS_REQUIRED));
    }
    if child_ids.len() > MAX_CHILD_BATCH {
        return Err(CoreError::Validation(format!(
            "Too many child employees: {} (max {MAX_CHILD_BATCH})",
            child_ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(child_ids.len());
    for id in child_ids {
        if !is_valid_unique_id(id) {
            return Err(CoreError::validation(
                "Invalid child employee id in child_employee_ids",
            ));
        }
        if id == parent_unique_id || id == parent_employee_id {
            return Err(CoreError::validation(
                "A scorecard cannot be its own child",
            ));
        }
        if !seen.insert(id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate child employee id '{id}'"
            )));
        }
    }
    Ok(())
}
