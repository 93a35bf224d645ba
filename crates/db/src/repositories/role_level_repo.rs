//! Repository for the `role_levels` table.

use sqlx::PgPool;
use trakker_core::role_level::RankedLevel;
use trakker_core::types::DbId;

use crate::models::role_level::{CreateRoleLevel, RoleLevel, RoleLevelQuery, UpdateRoleLevel};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, level_unique_id, template_id, name, rank, answers, \
                       deleted, created, modified";

/// Live rows of one company, optionally narrowed by a name pattern (`$2`).
const LIVE_FILTER: &str = "company_id = $1 AND deleted = FALSE \
                           AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\\')";

/// Provides CRUD operations for role levels.
pub struct RoleLevelRepo;

impl RoleLevelRepo {
    /// Insert a new role level, returning the created row.
    ///
    /// A duplicate `level_unique_id` within the company violates
    /// `uq_role_levels_company_level_unique_id`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateRoleLevel,
    ) -> Result<RoleLevel, sqlx::Error> {
        let query = format!(
            "INSERT INTO role_levels (company_id, level_unique_id, template_id, name, rank, answers)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoleLevel>(&query)
            .bind(company_id)
            .bind(&input.level_unique_id)
            .bind(input.template_id)
            .bind(&input.name)
            .bind(input.rank)
            .bind(&input.answers)
            .fetch_one(pool)
            .await
    }

    /// Find a live role level by its unique id. Excludes soft-deleted rows
    /// and rows of other companies.
    pub async fn find_by_unique_id(
        pool: &PgPool,
        company_id: DbId,
        level_unique_id: &str,
    ) -> Result<Option<RoleLevel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM role_levels
             WHERE company_id = $1 AND level_unique_id = $2 AND deleted = FALSE"
        );
        sqlx::query_as::<_, RoleLevel>(&query)
            .bind(company_id)
            .bind(level_unique_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of live role levels.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        params: &RoleLevelQuery,
    ) -> Result<Vec<RoleLevel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM role_levels WHERE {LIVE_FILTER}
             ORDER BY {} LIMIT $3 OFFSET $4",
            params.sort.to_sql()
        );
        sqlx::query_as::<_, RoleLevel>(&query)
            .bind(company_id)
            .bind(&params.search)
            .bind(params.page.limit)
            .bind(params.page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count live role levels matching `search`, ignoring pagination.
    pub async fn count(
        pool: &PgPool,
        company_id: DbId,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM role_levels WHERE {LIVE_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(company_id)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// `(rank, level_unique_id, name)` for every live level, ordered by rank.
    pub async fn list_ranked(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<RankedLevel>, sqlx::Error> {
        sqlx::query_as::<_, RankedLevel>(
            "SELECT rank, level_unique_id, name FROM role_levels
             WHERE company_id = $1 AND deleted = FALSE
             ORDER BY rank NULLS LAST, created, id",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Replace a live role level's template, answers and derived columns.
    ///
    /// Returns `None` if no live row with the given unique id exists.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        level_unique_id: &str,
        input: &UpdateRoleLevel,
    ) -> Result<Option<RoleLevel>, sqlx::Error> {
        let query = format!(
            "UPDATE role_levels SET
                template_id = $3,
                name = $4,
                rank = $5,
                answers = $6
             WHERE company_id = $1 AND level_unique_id = $2 AND deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoleLevel>(&query)
            .bind(company_id)
            .bind(level_unique_id)
            .bind(input.template_id)
            .bind(&input.name)
            .bind(input.rank)
            .bind(&input.answers)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a role level. Returns `true` if a row was marked deleted;
    /// `false` when it is missing or already deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        company_id: DbId,
        level_unique_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE role_levels SET deleted = TRUE
             WHERE company_id = $1 AND level_unique_id = $2 AND deleted = FALSE",
        )
        .bind(company_id)
        .bind(level_unique_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
