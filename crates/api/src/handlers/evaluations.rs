//! Handlers for the `/scorecard-evaluations` resource.
//!
//! Evaluations hang off a live scorecard. The evaluator is always the
//! authenticated user and the evaluated employee is the scorecard's.

use axum::extract::State;
use axum::Json;
use trakker_core::audit::{actions, entity_types};
use trakker_core::coerce::as_f64;
use trakker_core::dates::parse_date;
use trakker_core::document::parse_blob;
use trakker_core::error::CoreError;
use trakker_core::evaluation::{self, EvaluationStats, STATUS_DRAFT};
use trakker_core::messages;
use trakker_core::pagination::PageRequest;
use trakker_core::sanitize::escape_html;
use trakker_db::models::evaluation::{CreateEvaluation, ScorecardEvaluation};
use trakker_db::repositories::{EvaluationRepo, ScorecardRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::audit::{self, AuditEntry};
use crate::middleware::auth::AuthUser;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::AppState;

const SCORECARD_KEYS: &[&str] = &["scorecard_unique_id", "scorecardUniqueId"];

fn required_scorecard_id(payload: &Payload) -> AppResult<String> {
    payload.text(SCORECARD_KEYS).ok_or_else(|| {
        AppError::Core(CoreError::validation(
            messages::EVALUATION_SCORECARD_REQUIRED,
        ))
    })
}

/// GET /api/scorecard-evaluations/getScorecardEvaluations
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<ScorecardEvaluation>>>> {
    let scorecard_unique_id = required_scorecard_id(&payload)?;
    let page = PageRequest::from_values(payload.get("page"), payload.get("limit"));

    let evaluations =
        EvaluationRepo::list_for_scorecard(&state.pool, auth.company_id, &scorecard_unique_id, page)
            .await?;
    let total =
        EvaluationRepo::count_for_scorecard(&state.pool, auth.company_id, &scorecard_unique_id)
            .await?;

    tracing::debug!(
        company_id = auth.company_id,
        scorecard_unique_id = %scorecard_unique_id,
        total,
        "Listed evaluations"
    );

    Ok(Json(ApiResponse::list(evaluations, total)))
}

/// POST /api/scorecard-evaluations/createScorecardEvaluation
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<ScorecardEvaluation>>> {
    let scorecard_unique_id = payload
        .text(SCORECARD_KEYS)
        .ok_or_else(|| CoreError::Validation(messages::field_required("scorecard_unique_id")))?;
    let evaluation_date = payload
        .text(&["evaluation_date"])
        .ok_or_else(|| CoreError::Validation(messages::field_required("evaluation_date")))?;
    let evaluation_date = parse_date(&evaluation_date, "evaluation_date")?;

    let grade = match payload.first(&["grade"]) {
        Some(raw) => {
            let grade = as_f64(raw).unwrap_or(f64::NAN);
            evaluation::validate_grade(grade)?;
            Some(grade)
        }
        None => None,
    };
    let status = payload
        .text(&["status"])
        .unwrap_or_else(|| STATUS_DRAFT.to_string());
    evaluation::validate_status(&status)?;

    let evaluation_data = parse_blob(payload.get("evaluation_data")).map_err(|e| {
        AppError::Core(CoreError::Validation(format!(
            "{}: {e}",
            messages::INVALID_EVALUATION_DATA
        )))
    })?;

    let scorecard =
        ScorecardRepo::find_by_unique_id(&state.pool, auth.company_id, &scorecard_unique_id)
            .await?
            .ok_or_else(|| CoreError::not_found(messages::EVALUATION_SCORECARD_NOT_FOUND))?;

    let scorecard_name = scorecard.title.clone();
    let input = CreateEvaluation {
        scorecard_unique_id: scorecard.scorecard_unique_id,
        evaluator_id: auth.user_id,
        evaluator_username: auth.username.clone(),
        evaluated_employee_id: Some(scorecard.employee_id),
        evaluation_data,
        grade,
        notes: payload.text(&["notes"]).map(|n| escape_html(&n)),
        evaluation_date,
        status,
    };
    let evaluation = EvaluationRepo::create(&state.pool, auth.company_id, &input).await?;

    tracing::info!(
        company_id = auth.company_id,
        evaluation_id = evaluation.id,
        scorecard_unique_id = %evaluation.scorecard_unique_id,
        evaluator_id = auth.user_id,
        "Evaluation created"
    );
    audit::record(
        &state,
        &auth,
        AuditEntry::new(actions::EVALUATE, entity_types::SCORECARD, &evaluation.scorecard_unique_id)
            .named(scorecard_name.as_deref())
            .diff(None, &evaluation),
    )
    .await;

    Ok(Json(
        ApiResponse::data(evaluation).with_message(messages::EVALUATION_CREATED),
    ))
}

/// DELETE /api/scorecard-evaluations/deleteScorecardEvaluation
///
/// `evaluation_id` (or `id`) may come from the query string or the body.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<()>>> {
    let evaluation_id = payload
        .int(&["evaluation_id", "id"])
        .ok_or_else(|| CoreError::validation(messages::EVALUATION_ID_REQUIRED))?;

    let existing = EvaluationRepo::find_by_id(&state.pool, auth.company_id, evaluation_id)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::EVALUATION_NOT_FOUND))?;
    let deleted = EvaluationRepo::soft_delete(&state.pool, auth.company_id, evaluation_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found(
            messages::EVALUATION_NOT_FOUND,
        )));
    }

    tracing::info!(
        company_id = auth.company_id,
        evaluation_id,
        "Evaluation deleted"
    );
    audit::record(
        &state,
        &auth,
        AuditEntry::new(actions::DELETE, entity_types::EVALUATION, evaluation_id.to_string())
            .named(Some(existing.scorecard_unique_id.as_str())),
    )
    .await;

    Ok(Json(ApiResponse::message(messages::EVALUATION_DELETED)))
}

/// GET /api/scorecard-evaluations/getEvaluationStats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<EvaluationStats>>> {
    let scorecard_unique_id = required_scorecard_id(&payload)?;
    let aggregate =
        EvaluationRepo::aggregate(&state.pool, auth.company_id, &scorecard_unique_id).await?;

    Ok(Json(ApiResponse::data(EvaluationStats::new(
        aggregate.total,
        aggregate.completed,
        aggregate.draft,
        aggregate.average_grade,
    ))))
}
