//! Route definitions for the `/scorecards` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{scorecards, templates};
use crate::state::AppState;

/// Routes mounted at `/scorecards`.
///
/// ```text
/// GET    /tableHeaders               -> table_headers
/// GET    /getScorecardTemplate       -> templates::get_scorecard_template
/// POST   /addScorecard               -> add
/// POST   /updateScorecard            -> update
/// POST   /deleteScorecard            -> delete
/// GET    /getScorecardData           -> list
/// POST   /getScorecardData           -> get_detail
/// GET    /getScorecardsData          -> list
/// GET    /getMyScorecardsData        -> list_mine
/// GET    /getMyTeamScorecardsData    -> list_team
/// POST   /createChildScorecards      -> create_children
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tableHeaders", get(scorecards::table_headers))
        .route(
            "/getScorecardTemplate",
            get(templates::get_scorecard_template),
        )
        .route("/addScorecard", post(scorecards::add))
        .route("/updateScorecard", post(scorecards::update))
        .route("/deleteScorecard", post(scorecards::delete))
        .route(
            "/getScorecardData",
            get(scorecards::list).post(scorecards::get_detail),
        )
        .route("/getScorecardsData", get(scorecards::list))
        .route("/getMyScorecardsData", get(scorecards::list_mine))
        .route("/getMyTeamScorecardsData", get(scorecards::list_team))
        .route("/createChildScorecards", post(scorecards::create_children))
}
