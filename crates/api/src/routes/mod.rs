pub mod audit;
pub mod evaluations;
pub mod health;
pub mod role_levels;
pub mod scorecards;
pub mod templates;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/login                                     login (public)
///
/// /role-levels/...                                 role level CRUD, headers, rank conflicts
/// /scorecards/...                                  scorecard CRUD, lists, child fan-out
/// /scorecard-evaluations/...                       evaluation create, list, delete, stats
///
/// /level-templates/...                             level template store
/// /scorecard-templates/...                         scorecard template store
///
/// /audit-logs/...                                  audit trail list, details, stats
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/role-levels", role_levels::router())
        .nest("/scorecards", scorecards::router())
        .nest("/scorecard-evaluations", evaluations::router())
        .nest("/level-templates", templates::level_router())
        .nest("/scorecard-templates", templates::scorecard_router())
        .nest("/audit-logs", audit::router())
}
