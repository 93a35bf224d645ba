//! Client-facing message text.
//!
//! Callers and integration tests match on substrings of these messages
//! (`"template_id"`, `"not found"`, `"Failed to save level"` ...), so they
//! are defined once here and never inlined in handlers.

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

pub const UNAUTHORIZED: &str = "Unauthorized access";
pub const UNAUTHORIZED_MISSING_HEADER: &str =
    "Unauthorized access: missing Authorization header";
pub const UNAUTHORIZED_BAD_SCHEME: &str =
    "Unauthorized access: expected Authorization: Bearer <token>";
pub const UNAUTHORIZED_BAD_TOKEN: &str = "Unauthorized access: invalid or expired token";
pub const LOGIN_FIELDS_REQUIRED: &str = "Username and password are required";
pub const LOGIN_INVALID: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

pub const MALFORMED_BODY: &str = "Malformed request body";
pub const PAYLOAD_TOO_LARGE: &str = "Request body is too large";
pub const INTERNAL: &str = "An internal error occurred";
pub const ROUTE_NOT_FOUND: &str = "Endpoint not found";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub const INVALID_TEMPLATE_ID: &str = "Invalid template ID.";
pub const INVALID_TEMPLATE_STRUCTURE: &str = "Invalid template structure";
pub const TEMPLATE_NAME_REQUIRED: &str = "Template name is required and must be at most 200 characters";
pub const TEMPLATE_ID_REQUIRED: &str = "Template ID is required.";
pub const TEMPLATE_NOT_FOUND: &str = "Template not found";
pub const LEVEL_TEMPLATE_MISSING: &str = "No role levels template found.";
pub const SCORECARD_TEMPLATE_MISSING: &str = "No scorecard template found.";
pub const LEVEL_HEADERS_MISSING: &str =
    "Required fields (Level or Rank/Order) not found in template.";

// ---------------------------------------------------------------------------
// Role levels
// ---------------------------------------------------------------------------

pub const ROLE_LEVEL_ADD_INPUT: &str =
    "Invalid input: template_id, role level unique id and valid answers are required.";
pub const ROLE_LEVEL_UPDATE_INPUT: &str =
    "Invalid input: template_id, level_unique_id, and valid answers are required.";
pub const ROLE_LEVEL_INVALID_ID: &str = "Invalid role level unique id";
pub const ROLE_LEVEL_SAVE_FAILED: &str = "Failed to save level";
pub const ROLE_LEVEL_UPDATE_FAILED: &str = "Failed to update level";
pub const ROLE_LEVEL_SAVED: &str = "Role level saved successfully";
pub const ROLE_LEVEL_UPDATED: &str = "Role level updated successfully";
pub const ROLE_LEVEL_DELETED: &str = "Role level deleted successfully";
pub const ROLE_LEVEL_NOT_FOUND: &str = "Role level not found";
pub const ROLE_LEVEL_DUPLICATE: &str = "A role level with this unique id already exists";
pub const MISSING_LEVEL_UNIQUE_ID: &str = "Missing level unique id";
pub const MISSING_ROLE_LEVEL_ID: &str = "Missing role_level_id";

// ---------------------------------------------------------------------------
// Scorecards
// ---------------------------------------------------------------------------

pub const SCORECARD_ID_REQUIRED: &str = "Scorecard unique id is required.";
pub const SCORECARD_INVALID_ID: &str = "Invalid scorecard unique id";
pub const EMPLOYEE_ID_REQUIRED: &str = "Employee ID is required.";
pub const EMPLOYEE_ID_INVALID: &str = "Invalid employee id";
pub const MANAGER_ID_INVALID: &str = "Invalid manager id";
pub const PARENT_SCORECARD_INVALID: &str = "Invalid parent scorecard id";
pub const SCORECARD_NOT_FOUND: &str = "Scorecard not found.";
pub const SCORECARD_SAVED: &str = "Scorecard saved successfully.";
pub const SCORECARD_UPDATED: &str = "Scorecard updated successfully.";
pub const SCORECARD_DELETED: &str = "Scorecard deleted successfully.";
pub const SCORECARD_DUPLICATE: &str = "A scorecard with this unique id already exists";
pub const INVALID_DATA: &str = "Invalid data";
pub const PARENT_SCORECARD_REQUIRED: &str = "Parent scorecard id is required.";
pub const PARENT_SCORECARD_NOT_FOUND: &str = "Parent scorecard not found.";
pub const CHILD_IDS_REQUIRED: &str = "child_employee_ids must be a non-empty list";
pub const CHILDREN_CREATED: &str = "Child scorecards created successfully.";

// ---------------------------------------------------------------------------
// Evaluations
// ---------------------------------------------------------------------------

pub const EVALUATION_SCORECARD_REQUIRED: &str = "Scorecard unique ID is required";
pub const EVALUATION_SCORECARD_NOT_FOUND: &str = "Scorecard not found";
pub const EVALUATION_ID_REQUIRED: &str = "Evaluation ID is required";
pub const EVALUATION_NOT_FOUND: &str = "Evaluation not found";
pub const EVALUATION_CREATED: &str = "Evaluation created successfully";
pub const EVALUATION_DELETED: &str = "Evaluation deleted successfully";
pub const INVALID_EVALUATION_DATA: &str = "Invalid evaluation_data";

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

pub const AUDIT_LOG_ID_REQUIRED: &str = "Audit log ID is required";
pub const AUDIT_LOG_NOT_FOUND: &str = "Audit log not found";

/// `"Field '<name>' is required"`.
pub fn field_required(field: &str) -> String {
    format!("Field '{field}' is required")
}
