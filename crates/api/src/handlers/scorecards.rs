//! Handlers for the `/scorecards` resource.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use trakker_core::audit::{actions, entity_types};
use trakker_core::dates::parse_date;
use trakker_core::document::parse_blob;
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::sanitize::escape_html;
use trakker_core::scorecard::{self, parse_child_ids, validate_child_batch, STATUS_DRAFT};
use trakker_core::template::{TableHeader, TemplateStructure, SCORECARD_INFO_GROUP};
use trakker_core::types::{Date, DbId};
use trakker_core::unique_id::{generate_scorecard_id, is_valid_unique_id};
use trakker_db::models::scorecard::{CreateScorecard, Scorecard, ScorecardQuery, UpdateScorecard};
use trakker_db::models::template::TemplateKind;
use trakker_db::repositories::{ScorecardRepo, TemplateRepo};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::audit::{self, AuditEntry};
use crate::handlers::templates::{load_for_display, load_for_write};
use crate::middleware::auth::AuthUser;
use crate::payload::Payload;
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const UNIQUE_CONSTRAINT: &str = "uq_scorecards_company_unique_id";

const ID_KEYS: &[&str] = &["scorecard_unique_id", "scorecardUniqueId"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A scorecard with the structure of its template.
#[derive(Debug, Serialize)]
pub struct ScorecardDetail {
    #[serde(flatten)]
    pub scorecard: Scorecard,
    pub structure: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SavedScorecard {
    pub scorecard_unique_id: String,
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

/// Escaped text of an optional free-text field.
fn text_field(payload: &Payload, key: &str) -> Option<String> {
    payload.text(&[key]).map(|s| escape_html(&s))
}

/// An identifier field (employee, manager, parent scorecard). Identifiers
/// are matched verbatim by the "my" and "team" views, so they are checked
/// against the unique id syntax and stored unescaped.
fn id_field(payload: &Payload, key: &str, invalid: &'static str) -> AppResult<Option<String>> {
    match payload.text(&[key]) {
        Some(id) if is_valid_unique_id(&id) => Ok(Some(id)),
        Some(_) => Err(AppError::Core(CoreError::validation(invalid))),
        None => Ok(None),
    }
}

fn date_field(payload: &Payload, key: &str) -> AppResult<Option<Date>> {
    match payload.text(&[key]) {
        Some(raw) => Ok(Some(parse_date(&raw, key)?)),
        None => Ok(None),
    }
}

fn data_field(payload: &Payload) -> AppResult<Option<Value>> {
    parse_blob(payload.get("data")).map_err(|e| {
        AppError::Core(CoreError::Validation(format!("{}: {e}", messages::INVALID_DATA)))
    })
}

/// Status from the payload, `draft` when absent.
fn status_field(payload: &Payload) -> AppResult<String> {
    let status = payload.text(&["status"]).unwrap_or_else(|| STATUS_DRAFT.to_string());
    scorecard::validate_status(&status)?;
    Ok(status)
}

/// Require a template id and a live scorecard template behind it.
async fn template_for_write(
    state: &AppState,
    company_id: DbId,
    payload: &Payload,
) -> AppResult<DbId> {
    if !payload.has(&["template_id"]) {
        return Err(AppError::Core(CoreError::validation(
            messages::TEMPLATE_ID_REQUIRED,
        )));
    }
    let template_id = payload
        .int(&["template_id"])
        .ok_or_else(|| CoreError::validation(messages::INVALID_TEMPLATE_ID))?;
    load_for_write(
        state,
        TemplateKind::Scorecard,
        company_id,
        template_id,
        SCORECARD_INFO_GROUP,
    )
    .await?;
    Ok(template_id)
}

fn map_duplicate(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err, UNIQUE_CONSTRAINT) {
        AppError::Core(CoreError::Conflict(messages::SCORECARD_DUPLICATE.into()))
    } else {
        AppError::Database(err)
    }
}

/// Audit entry for a scorecard, named by its title when it has one.
fn audit_entry(action: &'static str, scorecard: &Scorecard) -> AuditEntry {
    AuditEntry::new(action, entity_types::SCORECARD, &scorecard.scorecard_unique_id)
        .named(scorecard.title.as_deref())
}

fn warn_if_self_managed(company_id: DbId, employee_id: &str, manager_id: Option<&str>) {
    if manager_id == Some(employee_id) {
        tracing::warn!(
            company_id,
            employee_id = %employee_id,
            "Scorecard manager is the employee"
        );
    }
}

/// Which scorecards a list request covers.
#[derive(Clone, Copy)]
enum Scope<'a> {
    Company,
    Employee(&'a str),
    TeamOf(&'a str),
}

async fn list_scoped(
    auth: &AuthUser,
    state: &AppState,
    payload: &Payload,
    scope: Scope<'_>,
) -> AppResult<Json<ApiResponse<Vec<Scorecard>>>> {
    let params = ListParams::from_payload(payload, scorecard::SORT_FIELDS, scorecard::DEFAULT_SORT);
    let query = ScorecardQuery {
        employee_id: match scope {
            Scope::Employee(employee_id) => Some(employee_id.to_string()),
            _ => None,
        },
        status: payload.text(&["status"]),
        search: params.search,
        sort: params.sort,
        page: params.page,
    };

    let (scorecards, total) = match scope {
        Scope::TeamOf(employee_id) => {
            let rows =
                ScorecardRepo::list_team(&state.pool, auth.company_id, employee_id, &query).await?;
            let total =
                ScorecardRepo::count_team(&state.pool, auth.company_id, employee_id, &query).await?;
            (rows, total)
        }
        Scope::Company | Scope::Employee(_) => {
            let rows = ScorecardRepo::list(&state.pool, auth.company_id, &query).await?;
            let total = ScorecardRepo::count(&state.pool, auth.company_id, &query).await?;
            (rows, total)
        }
    };

    tracing::debug!(
        company_id = auth.company_id,
        page = query.page.page,
        limit = query.page.limit,
        total,
        "Listed scorecards"
    );

    Ok(Json(ApiResponse::list(scorecards, total)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/scorecards/tableHeaders
///
/// Fixed columns, followed by the template's `scorecard_info` fields when
/// the company has a scorecard template.
pub async fn table_headers(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TableHeader>>>> {
    let template =
        TemplateRepo::find_latest(&state.pool, TemplateKind::Scorecard, auth.company_id).await?;
    let structure = template.and_then(|t| TemplateStructure::parse(&t.structure).ok());
    Ok(Json(ApiResponse::data(scorecard::table_headers(
        structure.as_ref(),
    ))))
}

/// POST /api/scorecards/addScorecard
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<SavedScorecard>>> {
    let scorecard_unique_id = payload
        .text(ID_KEYS)
        .ok_or_else(|| CoreError::validation(messages::SCORECARD_ID_REQUIRED))?;
    if !is_valid_unique_id(&scorecard_unique_id) {
        return Err(AppError::Core(CoreError::validation(
            messages::SCORECARD_INVALID_ID,
        )));
    }
    if !payload.has(&["template_id"]) {
        return Err(AppError::Core(CoreError::validation(
            messages::TEMPLATE_ID_REQUIRED,
        )));
    }
    let employee_id = id_field(&payload, "employee_id", messages::EMPLOYEE_ID_INVALID)?
        .ok_or_else(|| CoreError::validation(messages::EMPLOYEE_ID_REQUIRED))?;
    let manager_id = id_field(&payload, "manager_id", messages::MANAGER_ID_INVALID)?;
    let parent_scorecard_id = id_field(
        &payload,
        "parent_scorecard_id",
        messages::PARENT_SCORECARD_INVALID,
    )?;

    let template_id = template_for_write(&state, auth.company_id, &payload).await?;

    warn_if_self_managed(auth.company_id, &employee_id, manager_id.as_deref());

    let input = CreateScorecard {
        scorecard_unique_id,
        template_id,
        employee_id,
        manager_id,
        parent_scorecard_id,
        title: text_field(&payload, "title"),
        description: text_field(&payload, "description"),
        status: status_field(&payload)?,
        period_start: date_field(&payload, "period_start")?,
        period_end: date_field(&payload, "period_end")?,
        data: data_field(&payload)?,
        created_by: Some(auth.user_id),
    };
    let scorecard = ScorecardRepo::create(&state.pool, auth.company_id, &input)
        .await
        .map_err(map_duplicate)?;

    tracing::info!(
        company_id = auth.company_id,
        scorecard_unique_id = %scorecard.scorecard_unique_id,
        "Scorecard created"
    );
    audit::record(
        &state,
        &auth,
        audit_entry(actions::CREATE, &scorecard).diff(None, &scorecard),
    )
    .await;

    Ok(Json(
        ApiResponse::data(SavedScorecard {
            scorecard_unique_id: scorecard.scorecard_unique_id,
            id: scorecard.id,
        })
        .with_message(messages::SCORECARD_SAVED),
    ))
}

/// POST /api/scorecards/updateScorecard
///
/// Present fields replace stored ones; `data`, when present, replaces the
/// stored blob whole.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Scorecard>>> {
    let scorecard_unique_id = payload
        .text(ID_KEYS)
        .ok_or_else(|| CoreError::validation(messages::SCORECARD_ID_REQUIRED))?;

    let existing = ScorecardRepo::find_by_unique_id(&state.pool, auth.company_id, &scorecard_unique_id)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::SCORECARD_NOT_FOUND))?;

    let template_id = if payload.has(&["template_id"]) {
        Some(template_for_write(&state, auth.company_id, &payload).await?)
    } else {
        None
    };
    let status = if payload.has(&["status"]) {
        Some(status_field(&payload)?)
    } else {
        None
    };

    let input = UpdateScorecard {
        template_id,
        employee_id: id_field(&payload, "employee_id", messages::EMPLOYEE_ID_INVALID)?,
        manager_id: id_field(&payload, "manager_id", messages::MANAGER_ID_INVALID)?,
        title: text_field(&payload, "title"),
        description: text_field(&payload, "description"),
        status,
        period_start: date_field(&payload, "period_start")?,
        period_end: date_field(&payload, "period_end")?,
        data: data_field(&payload)?,
    };

    let employee_id = input.employee_id.as_deref().unwrap_or(&existing.employee_id);
    let manager_id = input.manager_id.as_deref().or(existing.manager_id.as_deref());
    warn_if_self_managed(auth.company_id, employee_id, manager_id);

    let scorecard = ScorecardRepo::update(&state.pool, auth.company_id, &scorecard_unique_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::SCORECARD_NOT_FOUND))?;

    tracing::info!(
        company_id = auth.company_id,
        scorecard_unique_id = %scorecard.scorecard_unique_id,
        "Scorecard updated"
    );
    audit::record(
        &state,
        &auth,
        audit_entry(actions::UPDATE, &scorecard).diff(Some(&existing), &scorecard),
    )
    .await;

    Ok(Json(
        ApiResponse::data(scorecard).with_message(messages::SCORECARD_UPDATED),
    ))
}

/// POST /api/scorecards/deleteScorecard
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<()>>> {
    let scorecard_unique_id = payload
        .text(ID_KEYS)
        .ok_or_else(|| CoreError::validation(messages::SCORECARD_ID_REQUIRED))?;

    let existing = ScorecardRepo::find_by_unique_id(&state.pool, auth.company_id, &scorecard_unique_id)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::SCORECARD_NOT_FOUND))?;
    let deleted =
        ScorecardRepo::soft_delete(&state.pool, auth.company_id, &scorecard_unique_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found(
            messages::SCORECARD_NOT_FOUND,
        )));
    }

    tracing::info!(
        company_id = auth.company_id,
        scorecard_unique_id = %scorecard_unique_id,
        "Scorecard deleted"
    );
    audit::record(&state, &auth, audit_entry(actions::DELETE, &existing)).await;

    Ok(Json(ApiResponse::message(messages::SCORECARD_DELETED)))
}

/// GET /api/scorecards/getScorecardData (and getScorecardsData)
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<Scorecard>>>> {
    list_scoped(&auth, &state, &payload, Scope::Company).await
}

/// POST /api/scorecards/getScorecardData
pub async fn get_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<ScorecardDetail>>> {
    let scorecard_unique_id = payload
        .text(ID_KEYS)
        .ok_or_else(|| CoreError::validation(messages::SCORECARD_ID_REQUIRED))?;

    let scorecard =
        ScorecardRepo::find_by_unique_id(&state.pool, auth.company_id, &scorecard_unique_id)
            .await?
            .ok_or_else(|| CoreError::not_found(messages::SCORECARD_NOT_FOUND))?;
    let structure = load_for_display(
        &state,
        TemplateKind::Scorecard,
        auth.company_id,
        scorecard.template_id,
    )
    .await?
    .map(|(raw, _)| raw);

    Ok(Json(ApiResponse::data(ScorecardDetail {
        scorecard,
        structure,
    })))
}

/// GET /api/scorecards/getMyScorecardsData
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<Scorecard>>>> {
    list_scoped(&auth, &state, &payload, Scope::Employee(&auth.employee_id)).await
}

/// GET /api/scorecards/getMyTeamScorecardsData
///
/// Scorecards descending from the caller's own, excluding the caller's.
pub async fn list_team(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<Scorecard>>>> {
    list_scoped(&auth, &state, &payload, Scope::TeamOf(&auth.employee_id)).await
}

/// POST /api/scorecards/createChildScorecards
///
/// The whole batch is validated before one transaction inserts every
/// child; any failure writes nothing.
pub async fn create_children(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<Scorecard>>>> {
    let parent_id = payload
        .text(&["parent_scorecard_id", "parentScorecardId"])
        .ok_or_else(|| CoreError::validation(messages::PARENT_SCORECARD_REQUIRED))?;
    let child_ids = parse_child_ids(payload.get("child_employee_ids"))?;

    let parent = ScorecardRepo::find_by_unique_id(&state.pool, auth.company_id, &parent_id)
        .await?
        .ok_or_else(|| CoreError::validation(messages::PARENT_SCORECARD_NOT_FOUND))?;
    let template_id = template_for_write(&state, auth.company_id, &payload).await?;
    validate_child_batch(&parent.scorecard_unique_id, &parent.employee_id, &child_ids)?;

    let status = status_field(&payload)?;
    let title = text_field(&payload, "title");
    let description = text_field(&payload, "description");
    let period_start = date_field(&payload, "period_start")?;
    let period_end = date_field(&payload, "period_end")?;
    let data = data_field(&payload)?;
    let today = Utc::now().date_naive();

    let children: Vec<CreateScorecard> = child_ids
        .into_iter()
        .map(|employee_id| CreateScorecard {
            scorecard_unique_id: generate_scorecard_id(today),
            template_id,
            employee_id,
            manager_id: Some(parent.employee_id.clone()),
            parent_scorecard_id: Some(parent.scorecard_unique_id.clone()),
            title: title.clone(),
            description: description.clone(),
            status: status.clone(),
            period_start,
            period_end,
            data: data.clone(),
            created_by: Some(auth.user_id),
        })
        .collect();

    let created = ScorecardRepo::create_children(&state.pool, auth.company_id, &children)
        .await
        .map_err(map_duplicate)?;

    tracing::info!(
        company_id = auth.company_id,
        parent_scorecard_id = %parent.scorecard_unique_id,
        count = created.len(),
        "Child scorecards created"
    );
    for child in &created {
        audit::record(
            &state,
            &auth,
            audit_entry(actions::CREATE, child).diff(None, child),
        )
        .await;
    }

    let total = created.len() as i64;
    Ok(Json(
        ApiResponse::list(created, total).with_message(messages::CHILDREN_CREATED),
    ))
}
