//! Role level model and DTOs.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use trakker_core::pagination::{PageRequest, SortSpec};
use trakker_core::types::{DbId, Timestamp};

/// A row from the `role_levels` table.
///
/// `name` and `rank` are denormalized from `answers` on every write so they
/// can be searched and sorted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleLevel {
    pub id: DbId,
    pub company_id: DbId,
    pub level_unique_id: String,
    pub template_id: DbId,
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub answers: Value,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
}

/// DTO for creating a role level.
#[derive(Debug, Clone)]
pub struct CreateRoleLevel {
    pub level_unique_id: String,
    pub template_id: DbId,
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub answers: Value,
}

/// DTO for replacing a role level's content. Answers are replaced whole.
#[derive(Debug, Clone)]
pub struct UpdateRoleLevel {
    pub template_id: DbId,
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub answers: Value,
}

/// Filters for listing role levels.
#[derive(Debug, Clone)]
pub struct RoleLevelQuery {
    /// `ILIKE` pattern matched against `name`.
    pub search: Option<String>,
    pub sort: SortSpec,
    pub page: PageRequest,
}
