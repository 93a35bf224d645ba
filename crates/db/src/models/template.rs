//! Level and scorecard template models.
//!
//! Both template tables share one row shape; [`TemplateKind`] selects the
//! table.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use trakker_core::types::{DbId, Timestamp};

/// Which template table a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Level,
    Scorecard,
}

impl TemplateKind {
    pub fn table(&self) -> &'static str {
        match self {
            TemplateKind::Level => "level_templates",
            TemplateKind::Scorecard => "scorecard_templates",
        }
    }
}

/// A row from `level_templates` or `scorecard_templates`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub structure: Value,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
}

/// DTO for creating a template. `structure` must already be validated.
#[derive(Debug, Clone)]
pub struct CreateTemplate {
    pub name: String,
    pub structure: Value,
}

/// DTO for updating a template. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub structure: Option<Value>,
}
