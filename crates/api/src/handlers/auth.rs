//! Handlers for the `/users` resource (login).

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::types::DbId;
use trakker_db::repositories::UserRepo;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserInfo,
}

/// Public user info embedded in [`LoginData`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub employee_id: String,
    pub company_id: DbId,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/login
///
/// Authenticate with username + password and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    let username = payload.text(&["username"]);
    let password = payload.text(&["password"]);
    let (Some(username), Some(password)) = (username, password) else {
        return Err(AppError::Core(CoreError::validation(
            messages::LOGIN_FIELDS_REQUIRED,
        )));
    };

    let invalid = || AppError::Core(CoreError::Unauthorized(messages::LOGIN_INVALID.into()));

    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| {
            tracing::warn!(username = %username, "Login for unknown user");
            invalid()
        })?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Login with wrong password");
        return Err(invalid());
    }

    let subject = TokenSubject {
        user_id: user.id,
        company_id: user.company_id,
        username: &user.username,
        employee_id: &user.employee_id,
        role: &user.role,
    };
    let token = generate_access_token(&subject, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, company_id = user.company_id, "User logged in");

    Ok(Json(ApiResponse::data(LoginData {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            employee_id: user.employee_id,
            company_id: user.company_id,
            role: user.role,
        },
    })))
}
