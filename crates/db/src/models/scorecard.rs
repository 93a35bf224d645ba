//! Scorecard model and DTOs.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use trakker_core::pagination::{PageRequest, SortSpec};
use trakker_core::types::{Date, DbId, Timestamp};

/// A row from the `scorecards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scorecard {
    pub id: DbId,
    pub company_id: DbId,
    pub scorecard_unique_id: String,
    pub template_id: DbId,
    pub employee_id: String,
    pub manager_id: Option<String>,
    pub parent_scorecard_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub data: Option<Value>,
    pub created_by: Option<DbId>,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
}

/// DTO for creating a scorecard.
#[derive(Debug, Clone)]
pub struct CreateScorecard {
    pub scorecard_unique_id: String,
    pub template_id: DbId,
    pub employee_id: String,
    pub manager_id: Option<String>,
    pub parent_scorecard_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub data: Option<Value>,
    pub created_by: Option<DbId>,
}

/// DTO for updating a scorecard. `None` keeps the stored value; a present
/// `data` replaces the stored blob whole.
#[derive(Debug, Clone, Default)]
pub struct UpdateScorecard {
    pub template_id: Option<DbId>,
    pub employee_id: Option<String>,
    pub manager_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub data: Option<Value>,
}

/// Filters for listing scorecards.
#[derive(Debug, Clone)]
pub struct ScorecardQuery {
    /// Restrict to scorecards assigned to this employee.
    pub employee_id: Option<String>,
    pub status: Option<String>,
    /// `ILIKE` pattern matched against `title` and `scorecard_unique_id`.
    pub search: Option<String>,
    pub sort: SortSpec,
    pub page: PageRequest,
}
