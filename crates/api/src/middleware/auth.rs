//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Every tenant-scoped handler takes this as its first parameter and passes
/// `company_id` to the repositories:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<()>> {
///     tracing::info!(company_id = auth.company_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Tenant scope for every query made on behalf of this user.
    pub company_id: DbId,
    pub username: String,
    /// Employee identifier used for "my" and "my team" scorecard views.
    pub employee_id: String,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |msg: &str| AppError::Core(CoreError::Unauthorized(msg.to_string()));

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized(messages::UNAUTHORIZED_MISSING_HEADER))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized(messages::UNAUTHORIZED_BAD_SCHEME))?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized(messages::UNAUTHORIZED_BAD_TOKEN)
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            company_id: claims.company_id,
            username: claims.username,
            employee_id: claims.employee_id,
            role: claims.role,
        })
    }
}
