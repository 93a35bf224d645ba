//! Repository for the `audit_logs` and `audit_log_details` tables.

use sqlx::PgPool;
use trakker_core::types::DbId;

use crate::models::audit::{
    AuditCount, AuditLog, AuditLogDetail, AuditLogQuery, AuditStats, CreateAuditLog,
};

const COLUMNS: &str = "id, company_id, user_id, username, action, entity_type, entity_id, \
                       entity_name, description, created";

const DETAIL_COLUMNS: &str = "id, audit_log_id, field_name, field_label, old_value, new_value, \
                              change_type, created";

/// Shared filter for list and count. `$1` is the company.
const LIST_FILTER: &str = "company_id = $1
      AND ($2::TEXT IS NULL OR action = $2)
      AND ($3::TEXT IS NULL OR entity_type = $3)
      AND ($4::TEXT IS NULL OR entity_id = $4)
      AND ($5::TEXT IS NULL OR description ILIKE $5 ESCAPE '\\'
                            OR entity_name ILIKE $5 ESCAPE '\\')";

/// Provides append and query operations for the audit trail.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Insert an entry and its field changes in one transaction.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateAuditLog,
    ) -> Result<AuditLog, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO audit_logs
                (company_id, user_id, username, action, entity_type, entity_id,
                 entity_name, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let log = sqlx::query_as::<_, AuditLog>(&query)
            .bind(company_id)
            .bind(input.user_id)
            .bind(&input.username)
            .bind(input.action)
            .bind(input.entity_type)
            .bind(&input.entity_id)
            .bind(&input.entity_name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        for change in &input.changes {
            sqlx::query(
                "INSERT INTO audit_log_details
                    (audit_log_id, field_name, field_label, old_value, new_value, change_type)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(log.id)
            .bind(&change.field_name)
            .bind(&change.field_label)
            .bind(&change.old_value)
            .bind(&change.new_value)
            .bind(change.change_type.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            company_id,
            audit_log_id = log.id,
            details = input.changes.len(),
            "Audit entry recorded"
        );
        Ok(log)
    }

    /// One page of entries, newest first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        params: &AuditLogQuery,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs WHERE {LIST_FILTER}
             ORDER BY created DESC, id DESC LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(company_id)
            .bind(&params.action)
            .bind(&params.entity_type)
            .bind(&params.entity_id)
            .bind(&params.search)
            .bind(params.page.limit)
            .bind(params.page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        company_id: DbId,
        params: &AuditLogQuery,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM audit_logs WHERE {LIST_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(company_id)
            .bind(&params.action)
            .bind(&params.entity_type)
            .bind(&params.entity_id)
            .bind(&params.search)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Field changes of one entry, in insertion order. Callers resolve the
    /// entry through [`AuditLogRepo::find_by_id`] first for tenant scoping.
    pub async fn details(
        pool: &PgPool,
        audit_log_id: DbId,
    ) -> Result<Vec<AuditLogDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM audit_log_details
             WHERE audit_log_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AuditLogDetail>(&query)
            .bind(audit_log_id)
            .fetch_all(pool)
            .await
    }

    /// Totals and grouped counts over the company's whole trail.
    pub async fn stats(pool: &PgPool, company_id: DbId) -> Result<AuditStats, sqlx::Error> {
        let (total_actions, recent_actions) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE created >= NOW() - INTERVAL '7 days')
             FROM audit_logs WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await?;

        let grouped = |column: &str, limit: i64| {
            format!(
                "SELECT {column} AS key, COUNT(*) AS count FROM audit_logs
                 WHERE company_id = $1 GROUP BY {column}
                 ORDER BY count DESC, key LIMIT {limit}"
            )
        };

        let actions_by_type = sqlx::query_as::<_, AuditCount>(&grouped("action", 100))
            .bind(company_id)
            .fetch_all(pool)
            .await?;
        let actions_by_entity = sqlx::query_as::<_, AuditCount>(&grouped("entity_type", 100))
            .bind(company_id)
            .fetch_all(pool)
            .await?;
        let actions_by_user = sqlx::query_as::<_, AuditCount>(&grouped("username", 10))
            .bind(company_id)
            .fetch_all(pool)
            .await?;

        Ok(AuditStats {
            total_actions,
            recent_actions,
            actions_by_type,
            actions_by_entity,
            actions_by_user,
        })
    }
}
