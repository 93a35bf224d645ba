//! Route definitions for the `/audit-logs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audit-logs`.
///
/// ```text
/// GET /getAuditLogs         -> list
/// GET /getAuditLogDetails   -> get_details
/// GET /getAuditStats        -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getAuditLogs", get(audit::list))
        .route("/getAuditLogDetails", get(audit::get_details))
        .route("/getAuditStats", get(audit::stats))
}
