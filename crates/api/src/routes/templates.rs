//! Route definitions for the template stores.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/level-templates`.
///
/// ```text
/// POST   /addLevelTemplate           -> add_level_template
/// POST   /updateLevelTemplate        -> update_level_template
/// GET    /getLevelTemplate           -> get_level_template
/// ```
pub fn level_router() -> Router<AppState> {
    Router::new()
        .route("/addLevelTemplate", post(templates::add_level_template))
        .route("/updateLevelTemplate", post(templates::update_level_template))
        .route("/getLevelTemplate", get(templates::get_level_template))
}

/// Routes mounted at `/scorecard-templates`.
///
/// ```text
/// POST   /addScorecardTemplate       -> add_scorecard_template
/// POST   /updateScorecardTemplate    -> update_scorecard_template
/// GET    /getScorecardTemplate       -> get_scorecard_template
/// ```
pub fn scorecard_router() -> Router<AppState> {
    Router::new()
        .route("/addScorecardTemplate", post(templates::add_scorecard_template))
        .route(
            "/updateScorecardTemplate",
            post(templates::update_scorecard_template),
        )
        .route("/getScorecardTemplate", get(templates::get_scorecard_template))
}
