//! Audit log models and DTOs.
//!
//! Audit entries are immutable once written: there is no update DTO, no
//! `modified` column and no soft delete.

use serde::Serialize;
use sqlx::FromRow;
use trakker_core::audit::FieldChange;
use trakker_core::pagination::PageRequest;
use trakker_core::types::{DbId, Timestamp};

/// A row from the `audit_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub company_id: DbId,
    pub user_id: Option<DbId>,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub entity_name: Option<String>,
    pub description: String,
    pub created: Timestamp,
}

/// A row from the `audit_log_details` table: one changed field.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogDetail {
    pub id: DbId,
    pub audit_log_id: DbId,
    pub field_name: String,
    pub field_label: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: String,
    pub created: Timestamp,
}

/// DTO for recording an audit entry together with its field changes.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub username: String,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: String,
    pub entity_name: Option<String>,
    pub description: String,
    pub changes: Vec<FieldChange>,
}

/// Filters for listing audit entries. `None` means "any".
#[derive(Debug, Clone)]
pub struct AuditLogQuery {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// `ILIKE` pattern matched against `description` and `entity_name`.
    pub search: Option<String>,
    pub page: PageRequest,
}

/// A grouped count, e.g. entries per action.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditCount {
    pub key: String,
    pub count: i64,
}

/// Company-wide audit statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AuditStats {
    pub total_actions: i64,
    /// Entries from the last seven days.
    pub recent_actions: i64,
    pub actions_by_type: Vec<AuditCount>,
    pub actions_by_entity: Vec<AuditCount>,
    /// The ten most active users.
    pub actions_by_user: Vec<AuditCount>,
}
