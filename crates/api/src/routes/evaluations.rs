//! Route definitions for the `/scorecard-evaluations` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::evaluations;
use crate::state::AppState;

/// Routes mounted at `/scorecard-evaluations`.
///
/// ```text
/// GET    /getScorecardEvaluations    -> list
/// POST   /createScorecardEvaluation  -> create
/// DELETE /deleteScorecardEvaluation  -> delete
/// GET    /getEvaluationStats         -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getScorecardEvaluations", get(evaluations::list))
        .route("/createScorecardEvaluation", post(evaluations::create))
        .route("/deleteScorecardEvaluation", delete(evaluations::delete))
        .route("/getEvaluationStats", get(evaluations::stats))
}
