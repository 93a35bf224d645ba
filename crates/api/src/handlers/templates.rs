//! Handlers for the `/level-templates` and `/scorecard-templates` resources.
//!
//! Both template families share one table shape and one set of handlers;
//! the public functions below only pick the [`TemplateKind`].

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use trakker_core::error::CoreError;
use trakker_core::messages;
use trakker_core::sanitize::{escape_html, escape_json_strings};
use trakker_core::template::{TemplateDraft, TemplateStructure};
use trakker_core::types::DbId;
use trakker_db::models::template::{CreateTemplate, Template, TemplateKind, UpdateTemplate};
use trakker_db::repositories::TemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Template as returned to clients.
#[derive(Debug, Serialize)]
pub struct TemplateView {
    pub template_id: DbId,
    pub name: String,
    pub structure: Value,
}

impl From<Template> for TemplateView {
    fn from(t: Template) -> Self {
        Self {
            template_id: t.id,
            name: t.name,
            structure: t.structure,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedTemplate {
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

/// Load a live template and its parsed structure for a record write.
///
/// A missing, deleted or unparseable template, or one without
/// `required_group`, is reported as `"Invalid template ID."`.
pub(crate) async fn load_for_write(
    state: &AppState,
    kind: TemplateKind,
    company_id: DbId,
    template_id: DbId,
    required_group: &str,
) -> AppResult<TemplateStructure> {
    let invalid = || AppError::Core(CoreError::validation(messages::INVALID_TEMPLATE_ID));

    let template = TemplateRepo::find_by_id(&state.pool, kind, company_id, template_id)
        .await?
        .ok_or_else(invalid)?;
    let structure = TemplateStructure::parse(&template.structure).map_err(|_| invalid())?;
    structure.require_group(required_group)?;
    Ok(structure)
}

/// Parsed structure of a template for display. A template that has since
/// been deleted or no longer parses yields `None`.
pub(crate) async fn load_for_display(
    state: &AppState,
    kind: TemplateKind,
    company_id: DbId,
    template_id: DbId,
) -> AppResult<Option<(Value, TemplateStructure)>> {
    let template = TemplateRepo::find_by_id(&state.pool, kind, company_id, template_id).await?;
    Ok(template.and_then(|t| {
        TemplateStructure::parse(&t.structure)
            .ok()
            .map(|s| (t.structure, s))
    }))
}

/// Decode a structure for storage with every label and key escaped.
fn structure_for_storage(raw: &Value) -> AppResult<Value> {
    let (_, structure) = TemplateStructure::decode(raw)?;
    Ok(escape_json_strings(structure))
}

// ---------------------------------------------------------------------------
// Generic operations
// ---------------------------------------------------------------------------

async fn create(
    kind: TemplateKind,
    auth: AuthUser,
    state: AppState,
    payload: Payload,
) -> AppResult<Json<ApiResponse<CreatedTemplate>>> {
    let draft = TemplateDraft::validated(payload.text(&["name"]).unwrap_or_default())?;
    let raw = payload
        .first(&["structure"])
        .ok_or_else(|| CoreError::validation(messages::INVALID_TEMPLATE_STRUCTURE))?;
    let structure = structure_for_storage(raw)?;

    let input = CreateTemplate {
        name: escape_html(&draft.name),
        structure,
    };
    let template = TemplateRepo::create(&state.pool, kind, auth.company_id, &input).await?;

    tracing::info!(
        company_id = auth.company_id,
        template_id = template.id,
        table = kind.table(),
        "Template created"
    );

    Ok(Json(ApiResponse::data(CreatedTemplate { id: template.id })))
}

async fn update(
    kind: TemplateKind,
    auth: AuthUser,
    state: AppState,
    payload: Payload,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    let template_id = payload
        .int(&["template_id", "id"])
        .ok_or_else(|| CoreError::validation(messages::TEMPLATE_ID_REQUIRED))?;

    let name = match payload.first(&["name"]) {
        Some(_) => {
            let draft = TemplateDraft::validated(payload.text(&["name"]).unwrap_or_default())?;
            Some(escape_html(&draft.name))
        }
        None => None,
    };
    let structure = match payload.first(&["structure"]) {
        Some(raw) => Some(structure_for_storage(raw)?),
        None => None,
    };

    let input = UpdateTemplate { name, structure };
    let template = TemplateRepo::update(&state.pool, kind, auth.company_id, template_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(messages::TEMPLATE_NOT_FOUND))?;

    tracing::info!(
        company_id = auth.company_id,
        template_id,
        table = kind.table(),
        "Template updated"
    );

    Ok(Json(ApiResponse::data(TemplateView::from(template))))
}

/// The requested template, or the company's latest live one.
async fn get(
    kind: TemplateKind,
    auth: AuthUser,
    state: AppState,
    payload: Payload,
    missing: &'static str,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    let template = match payload.int(&["template_id"]) {
        Some(id) => TemplateRepo::find_by_id(&state.pool, kind, auth.company_id, id).await?,
        None => TemplateRepo::find_latest(&state.pool, kind, auth.company_id).await?,
    };
    let template = template.ok_or_else(|| CoreError::not_found(missing))?;
    Ok(Json(ApiResponse::data(TemplateView::from(template))))
}

// ---------------------------------------------------------------------------
// Level templates
// ---------------------------------------------------------------------------

/// POST /api/level-templates/addLevelTemplate
pub async fn add_level_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<CreatedTemplate>>> {
    create(TemplateKind::Level, auth, state, payload).await
}

/// POST /api/level-templates/updateLevelTemplate
pub async fn update_level_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    update(TemplateKind::Level, auth, state, payload).await
}

/// GET /api/level-templates/getLevelTemplate
pub async fn get_level_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    get(TemplateKind::Level, auth, state, payload, messages::LEVEL_TEMPLATE_MISSING).await
}

// ---------------------------------------------------------------------------
// Scorecard templates
// ---------------------------------------------------------------------------

/// POST /api/scorecard-templates/addScorecardTemplate
pub async fn add_scorecard_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<CreatedTemplate>>> {
    create(TemplateKind::Scorecard, auth, state, payload).await
}

/// POST /api/scorecard-templates/updateScorecardTemplate
pub async fn update_scorecard_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    update(TemplateKind::Scorecard, auth, state, payload).await
}

/// GET /api/scorecard-templates/getScorecardTemplate
///
/// Also mounted as `/api/scorecards/getScorecardTemplate`.
pub async fn get_scorecard_template(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Payload,
) -> AppResult<Json<ApiResponse<TemplateView>>> {
    get(
        TemplateKind::Scorecard,
        auth,
        state,
        payload,
        messages::SCORECARD_TEMPLATE_MISSING,
    )
    .await
}
