//! Repository for `level_templates` and `scorecard_templates`.

use sqlx::PgPool;
use trakker_core::types::DbId;

use crate::models::template::{CreateTemplate, Template, TemplateKind, UpdateTemplate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, structure, deleted, created, modified";

/// Provides CRUD operations for both template tables.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: TemplateKind,
        company_id: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (company_id, name, structure)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.structure)
            .fetch_one(pool)
            .await
    }

    /// Find a live template of the company by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: TemplateKind,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE id = $1 AND company_id = $2 AND deleted = FALSE",
            kind.table()
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// The company's most recently created live template.
    pub async fn find_latest(
        pool: &PgPool,
        kind: TemplateKind,
        company_id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE company_id = $1 AND deleted = FALSE
             ORDER BY created DESC, id DESC LIMIT 1",
            kind.table()
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a template. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live template with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        kind: TemplateKind,
        company_id: DbId,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET
                name = COALESCE($3, name),
                structure = COALESCE($4, structure)
             WHERE id = $1 AND company_id = $2 AND deleted = FALSE
             RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.structure)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a template. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        kind: TemplateKind,
        company_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted = TRUE WHERE id = $1 AND company_id = $2 AND deleted = FALSE",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
