//! Handlers for the `/role-levels` resource.
//!
//! A role level is an answers document filled against the company's level
//! template. Name and rank are extracted from the answers on every write so
//! lists can search and sort on them.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};
use trakker_core::audit::{actions, entity_types};
use trakker_core::document::AnswersDocument;
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::role_level::{
    self, edit_fields, extract_summary, find_rank_conflicts, labelled_fields, RankConflictReport,
    LEVEL_HEADER_ID, RANK_HEADER_ID,
};
use trakker_core::template::{TableHeader, TemplateStructure, LEVEL_INFO_GROUP};
use trakker_core::types::{DbId, Timestamp};
use trakker_core::unique_id::is_valid_unique_id;
use trakker_db::models::role_level::{CreateRoleLevel, RoleLevel, RoleLevelQuery, UpdateRoleLevel};
use trakker_db::models::template::TemplateKind;
use trakker_db::repositories::{RoleLevelRepo, TemplateRepo};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::audit::{self, AuditEntry};
use crate::handlers::templates::{load_for_display, load_for_write};
use crate::middleware::auth::AuthUser;
use crate::payload::Payload;
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const UNIQUE_CONSTRAINT: &str = "uq_role_levels_company_level_unique_id";

/// Aliases accepted for the unique id on create.
const ADD_ID_KEYS: &[&str] = &["roleLevelUniqueId", "level_unique_id"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One row of the role-level list.
#[derive(Debug, Serialize)]
pub struct RoleLevelRow {
    pub answer_id: DbId,
    pub level_unique_id: String,
    pub template_id: DbId,
    pub name: Option<String>,
    pub rank: Option<i32>,
    /// Values keyed by table header id (`level`, `rank/order`).
    pub fields: Map<String, Value>,
    pub created: Timestamp,
    pub modified: Timestamp,
}

impl From<RoleLevel> for RoleLevelRow {
    fn from(level: RoleLevel) -> Self {
        let mut fields = Map::new();
        fields.insert(LEVEL_HEADER_ID.into(), json!(level.name));
        fields.insert(RANK_HEADER_ID.into(), json!(level.rank));
        Self {
            answer_id: level.id,
            level_unique_id: level.level_unique_id,
            template_id: level.template_id,
            name: level.name,
            rank: level.rank,
            fields,
            created: level.created,
            modified: level.modified,
        }
    }
}

/// A single role level with its answers.
#[derive(Debug, Serialize)]
pub struct RoleLevelDetail {
    pub answer_id: DbId,
    pub level_unique_id: String,
    pub template_id: DbId,
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub answers: Value,
    pub fields: Map<String, Value>,
    /// Template structure, present on the edit view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<Value>,
    pub created: Timestamp,
    pub modified: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct SavedRoleLevel {
    pub level_unique_id: String,
    pub answer_id: DbId,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_live(state: &AppState, company_id: DbId, level_unique_id: &str) -> AppResult<RoleLevel> {
    RoleLevelRepo::find_by_unique_id(&state.pool, company_id, level_unique_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(messages::ROLE_LEVEL_NOT_FOUND)))
}

/// Map a duplicate unique id to 409 with a readable message.
fn map_duplicate(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err, UNIQUE_CONSTRAINT) {
        AppError::Core(CoreError::Conflict(messages::ROLE_LEVEL_DUPLICATE.into()))
    } else {
        AppError::Database(err)
    }
}

/// Parse answers and check them against the template. Failures are
/// reported as `"<prefix>: <reason>"`.
fn parse_answers(
    payload: &Payload,
    structure: &TemplateStructure,
    prefix: &str,
) -> AppResult<AnswersDocument> {
    let fail = |reason: String| AppError::Core(CoreError::Validation(format!("{prefix}: {reason}")));
    let answers = AnswersDocument::parse(payload.get("answers"), LEVEL_INFO_GROUP)
        .map_err(|e| fail(e.to_string()))?;
    structure
        .check_required(&answers)
        .map_err(|e| fail(e.to_string()))?;
    Ok(answers)
}

async fn load_detail(
    auth: &AuthUser,
    state: &AppState,
    payload: &Payload,
    edit: bool,
) -> AppResult<RoleLevelDetail> {
    let level_unique_id = payload
        .text(&["level_unique_id", "roleLevelUniqueId"])
        .ok_or_else(|| CoreError::validation(messages::MISSING_LEVEL_UNIQUE_ID))?;
    let level = find_live(state, auth.company_id, &level_unique_id).await?;

    let template =
        load_for_display(state, TemplateKind::Level, auth.company_id, level.template_id).await?;
    let answers = AnswersDocument::from_stored(&level.answers);
    let (fields, structure) = match template {
        Some((raw, structure)) if edit => (edit_fields(&structure, &answers), Some(raw)),
        Some((_, structure)) => (labelled_fields(&structure, &answers), None),
        None => (Map::new(), None),
    };

    Ok(RoleLevelDetail {
        answer_id: level.id,
        level_unique_id: level.level_unique_id,
        template_id: level.template_id,
        name: level.name,
        rank: level.rank,
        answers: level.answers,
        fields,
        structure,
        created: level.created,
        modified: level.modified,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/role-levels/tableHeaders
pub async fn table_headers(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TableHeader>>>> {
    let template = TemplateRepo::find_latest(&state.pool, TemplateKind::Level, auth.company_id)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::LEVEL_TEMPLATE_MISSING))?;
    let structure = TemplateStructure::parse(&template.structure)?;
    let headers = role_level::table_headers(&structure)?;
    Ok(Json(ApiResponse::data(headers)))
}

/// POST /api/role-levels/getRoleLevels
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<Vec<RoleLevelRow>>>> {
    let params = ListParams::from_payload(&payload, role_level::SORT_FIELDS, role_level::DEFAULT_SORT);
    let query = RoleLevelQuery {
        search: params.search,
        sort: params.sort,
        page: params.page,
    };

    let levels = RoleLevelRepo::list(&state.pool, auth.company_id, &query).await?;
    let total = RoleLevelRepo::count(&state.pool, auth.company_id, query.search.as_deref()).await?;

    tracing::debug!(
        company_id = auth.company_id,
        page = query.page.page,
        limit = query.page.limit,
        total,
        "Listed role levels"
    );

    let rows = levels.into_iter().map(RoleLevelRow::from).collect();
    Ok(Json(ApiResponse::list(rows, total)))
}

/// POST /api/role-levels/addRoleLevel
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<SavedRoleLevel>>> {
    if !payload.has(&["template_id"]) || !payload.has(ADD_ID_KEYS) {
        return Err(AppError::Core(CoreError::validation(
            messages::ROLE_LEVEL_ADD_INPUT,
        )));
    }
    let level_unique_id = payload.text(ADD_ID_KEYS).unwrap_or_default();
    if !is_valid_unique_id(&level_unique_id) {
        return Err(AppError::Core(CoreError::validation(
            messages::ROLE_LEVEL_INVALID_ID,
        )));
    }
    let template_id = payload
        .int(&["template_id"])
        .ok_or_else(|| CoreError::validation(messages::INVALID_TEMPLATE_ID))?;

    let structure = load_for_write(
        &state,
        TemplateKind::Level,
        auth.company_id,
        template_id,
        LEVEL_INFO_GROUP,
    )
    .await?;
    let answers = parse_answers(&payload, &structure, messages::ROLE_LEVEL_SAVE_FAILED)?;
    let summary = extract_summary(&structure, &answers);

    let input = CreateRoleLevel {
        level_unique_id,
        template_id,
        name: summary.name,
        rank: summary.rank,
        answers: answers.into_value(),
    };
    let level = RoleLevelRepo::create(&state.pool, auth.company_id, &input)
        .await
        .map_err(map_duplicate)?;

    tracing::info!(
        company_id = auth.company_id,
        level_unique_id = %level.level_unique_id,
        answer_id = level.id,
        "Role level created"
    );
    audit::record(
        &state,
        &auth,
        AuditEntry::new(actions::CREATE, entity_types::ROLE_LEVEL, &level.level_unique_id)
            .named(level.name.as_deref())
            .diff(None, &level),
    )
    .await;

    Ok(Json(
        ApiResponse::data(SavedRoleLevel {
            level_unique_id: level.level_unique_id,
            answer_id: level.id,
        })
        .with_message(messages::ROLE_LEVEL_SAVED),
    ))
}

/// POST /api/role-levels/getRoleLevelDetails
pub async fn get_details(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<RoleLevelDetail>>> {
    let detail = load_detail(&auth, &state, &payload, false).await?;
    Ok(Json(ApiResponse::data(detail)))
}

/// POST /api/role-levels/getEditRoleLevelDetail
pub async fn get_edit_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<RoleLevelDetail>>> {
    let detail = load_detail(&auth, &state, &payload, true).await?;
    Ok(Json(ApiResponse::data(detail)))
}

/// POST /api/role-levels/updateRoleLevel
///
/// Answers are replaced whole; name and rank are re-extracted.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<SavedRoleLevel>>> {
    let level_unique_id = payload.text(&["level_unique_id", "roleLevelUniqueId"]);
    let (Some(level_unique_id), true, true) = (
        level_unique_id,
        payload.has(&["template_id"]),
        payload.has(&["answers"]),
    ) else {
        return Err(AppError::Core(CoreError::validation(
            messages::ROLE_LEVEL_UPDATE_INPUT,
        )));
    };

    let existing = find_live(&state, auth.company_id, &level_unique_id).await?;

    let template_id = payload
        .int(&["template_id"])
        .ok_or_else(|| CoreError::validation(messages::INVALID_TEMPLATE_ID))?;
    let structure = load_for_write(
        &state,
        TemplateKind::Level,
        auth.company_id,
        template_id,
        LEVEL_INFO_GROUP,
    )
    .await?;
    let answers = parse_answers(&payload, &structure, messages::ROLE_LEVEL_UPDATE_FAILED)?;
    let summary = extract_summary(&structure, &answers);

    let input = UpdateRoleLevel {
        template_id,
        name: summary.name,
        rank: summary.rank,
        answers: answers.into_value(),
    };
    let level = RoleLevelRepo::update(&state.pool, auth.company_id, &level_unique_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::ROLE_LEVEL_NOT_FOUND))?;

    tracing::info!(
        company_id = auth.company_id,
        level_unique_id = %level.level_unique_id,
        "Role level updated"
    );
    audit::record(
        &state,
        &auth,
        AuditEntry::new(actions::UPDATE, entity_types::ROLE_LEVEL, &level.level_unique_id)
            .named(level.name.as_deref())
            .diff(Some(&existing), &level),
    )
    .await;

    Ok(Json(
        ApiResponse::data(SavedRoleLevel {
            level_unique_id: level.level_unique_id,
            answer_id: level.id,
        })
        .with_message(messages::ROLE_LEVEL_UPDATED),
    ))
}

/// POST /api/role-levels/deleteRoleLevel
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<()>>> {
    let level_unique_id = payload
        .text(&["role_level_id", "level_unique_id"])
        .ok_or_else(|| CoreError::validation(messages::MISSING_ROLE_LEVEL_ID))?;

    let existing = find_live(&state, auth.company_id, &level_unique_id).await?;
    let deleted = RoleLevelRepo::soft_delete(&state.pool, auth.company_id, &level_unique_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found(
            messages::ROLE_LEVEL_NOT_FOUND,
        )));
    }

    tracing::info!(
        company_id = auth.company_id,
        level_unique_id = %level_unique_id,
        "Role level deleted"
    );
    audit::record(
        &state,
        &auth,
        AuditEntry::new(actions::DELETE, entity_types::ROLE_LEVEL, level_unique_id)
            .named(existing.name.as_deref()),
    )
    .await;

    Ok(Json(ApiResponse::message(messages::ROLE_LEVEL_DELETED)))
}

/// GET /api/role-levels/checkRankConflicts
pub async fn check_rank_conflicts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<RankConflictReport>>> {
    let ranked = RoleLevelRepo::list_ranked(&state.pool, auth.company_id).await?;
    let report = find_rank_conflicts(ranked);
    if report.has_conflicts {
        tracing::debug!(
            company_id = auth.company_id,
            conflicts = report.conflict_count,
            "Rank conflicts found"
        );
    }
    Ok(Json(ApiResponse::data(report)))
}
