//! Route definitions for the `/role-levels` resource.
//!
//! Read endpoints that take filters accept both GET and POST.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::role_levels;
use crate::state::AppState;

/// Routes mounted at `/role-levels`.
///
/// ```text
/// GET        /tableHeaders               -> table_headers
/// GET|POST   /getRoleLevels              -> list
/// POST       /addRoleLevel               -> add
/// GET|POST   /getRoleLevelDetails        -> get_details
/// GET|POST   /getEditRoleLevelDetail     -> get_edit_detail
/// POST       /updateRoleLevel            -> update
/// POST       /deleteRoleLevel            -> delete
/// GET        /checkRankConflicts         -> check_rank_conflicts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tableHeaders", get(role_levels::table_headers))
        .route(
            "/getRoleLevels",
            get(role_levels::list).post(role_levels::list),
        )
        .route("/addRoleLevel", post(role_levels::add))
        .route(
            "/getRoleLevelDetails",
            get(role_levels::get_details).post(role_levels::get_details),
        )
        .route(
            "/getEditRoleLevelDetail",
            get(role_levels::get_edit_detail).post(role_levels::get_edit_detail),
        )
        .route("/updateRoleLevel", post(role_levels::update))
        .route("/deleteRoleLevel", post(role_levels::delete))
        .route("/checkRankConflicts", get(role_levels::check_rank_conflicts))
}
