//! Audit trail: recording mutations and the `/audit-logs` read endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Map;
use trakker_core::audit::{describe, field_changes, flatten, FieldChange};
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::pagination::PageRequest;
use trakker_core::search::build_like_pattern;
use trakker_db::models::audit::{AuditLog, AuditLogDetail, AuditLogQuery, AuditStats, CreateAuditLog};
use trakker_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// An audit entry about to be recorded for the authenticated user.
#[derive(Debug)]
pub(crate) struct AuditEntry {
    action: &'static str,
    entity_type: &'static str,
    entity_id: String,
    entity_name: Option<String>,
    changes: Vec<FieldChange>,
}

impl AuditEntry {
    pub(crate) fn new(action: &'static str, entity_type: &'static str, entity_id: impl Into<String>) -> Self {
        Self {
            action,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            changes: Vec::new(),
        }
    }

    pub(crate) fn named(mut self, name: Option<&str>) -> Self {
        self.entity_name = name.map(str::to_string);
        self
    }

    /// Diff two record snapshots. `old` is `None` for a new record, in
    /// which case every populated field is reported as added.
    pub(crate) fn diff<T: Serialize>(mut self, old: Option<&T>, new: &T) -> Self {
        let snapshot = |v: &T| {
            serde_json::to_value(v)
                .map(|v| flatten(&v))
                .unwrap_or_default()
        };
        let old = old.map(snapshot).unwrap_or_else(Map::new);
        self.changes = field_changes(&old, &snapshot(new));
        self
    }
}

/// Record `entry` for a mutation that has already been committed.
///
/// A failed audit write is logged and does not fail the request.
pub(crate) async fn record(state: &AppState, auth: &AuthUser, entry: AuditEntry) {
    let label = entry.entity_name.as_deref().unwrap_or(&entry.entity_id);
    let input = CreateAuditLog {
        user_id: Some(auth.user_id),
        username: auth.username.clone(),
        action: entry.action,
        entity_type: entry.entity_type,
        description: describe(entry.action, entry.entity_type, label),
        entity_id: entry.entity_id,
        entity_name: entry.entity_name,
        changes: entry.changes,
    };

    if let Err(e) = AuditLogRepo::create(&state.pool, auth.company_id, &input).await {
        tracing::error!(
            company_id = auth.company_id,
            action = input.action,
            entity_type = input.entity_type,
            entity_id = %input.entity_id,
            error = %e,
            "Failed to record audit entry"
        );
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AuditLogWithDetails {
    pub audit_log: AuditLog,
    pub details: Vec<AuditLogDetail>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/audit-logs/getAuditLogs
///
/// Filters: `action`, `entity_type`, `entity_id`, `search`.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<AuditLog>>>> {
    let query = AuditLogQuery {
        action: payload.text(&["action"]),
        entity_type: payload.text(&["entity_type"]),
        entity_id: payload.text(&["entity_id"]),
        search: build_like_pattern(payload.text(&["search"]).as_deref()),
        page: PageRequest::from_values(payload.get("page"), payload.get("limit")),
    };

    let logs = AuditLogRepo::list(&state.pool, auth.company_id, &query).await?;
    let total = AuditLogRepo::count(&state.pool, auth.company_id, &query).await?;

    Ok(Json(ApiResponse::list(logs, total)))
}

/// GET /api/audit-logs/getAuditLogDetails
pub async fn get_details(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<AuditLogWithDetails>>> {
    let id = payload
        .int(&["audit_log_id", "id"])
        .ok_or_else(|| CoreError::validation(messages::AUDIT_LOG_ID_REQUIRED))?;

    let audit_log = AuditLogRepo::find_by_id(&state.pool, auth.company_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::AUDIT_LOG_NOT_FOUND))?;
    let details = AuditLogRepo::details(&state.pool, audit_log.id).await?;

    Ok(Json(ApiResponse::data(AuditLogWithDetails { audit_log, details })))
}

/// GET /api/audit-logs/getAuditStats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AuditStats>>> {
    let stats = AuditLogRepo::stats(&state.pool, auth.company_id).await?;
    Ok(Json(ApiResponse::data(stats)))
}
