//! Repository for the `scorecards` table.

use sqlx::PgPool;
use trakker_core::types::DbId;

use crate::models::scorecard::{CreateScorecard, Scorecard, ScorecardQuery, UpdateScorecard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, scorecard_unique_id, template_id, employee_id, manager_id, \
                       parent_scorecard_id, title, description, status, period_start, period_end, \
                       data, created_by, deleted, created, modified";

/// Live rows of one company narrowed by employee (`$2`), status (`$3`) and
/// a title/unique-id pattern (`$4`). `NULL` parameters do not filter.
const LIST_FILTER: &str = "company_id = $1 AND deleted = FALSE \
     AND ($2::TEXT IS NULL OR employee_id = $2) \
     AND ($3::TEXT IS NULL OR status = $3) \
     AND ($4::TEXT IS NULL OR title ILIKE $4 ESCAPE '\\' OR scorecard_unique_id ILIKE $4 ESCAPE '\\')";

/// Unique ids of every live scorecard reachable from the scorecards
/// assigned to employee `$2`, following `parent_scorecard_id` links.
/// `UNION` deduplicates, so cyclic parent links terminate.
const TEAM_CTE: &str = "WITH RECURSIVE team(scorecard_unique_id) AS (
        SELECT scorecard_unique_id FROM scorecards
        WHERE company_id = $1 AND employee_id = $2 AND deleted = FALSE
        UNION
        SELECT s.scorecard_unique_id FROM scorecards s
        JOIN team t ON s.parent_scorecard_id = t.scorecard_unique_id
        WHERE s.company_id = $1 AND s.deleted = FALSE
    )";

/// Provides CRUD operations for scorecards.
pub struct ScorecardRepo;

impl ScorecardRepo {
    fn insert_query() -> String {
        format!(
            "INSERT INTO scorecards
                (company_id, scorecard_unique_id, template_id, employee_id, manager_id,
                 parent_scorecard_id, title, description, status, period_start, period_end,
                 data, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        )
    }

    /// Insert a new scorecard, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateScorecard,
    ) -> Result<Scorecard, sqlx::Error> {
        let query = Self::insert_query();
        Self::bind_create(sqlx::query_as::<_, Scorecard>(&query), company_id, input)
            .fetch_one(pool)
            .await
    }

    /// Insert a batch of child scorecards in one transaction. Either every
    /// row is created or none is.
    pub async fn create_children(
        pool: &PgPool,
        company_id: DbId,
        children: &[CreateScorecard],
    ) -> Result<Vec<Scorecard>, sqlx::Error> {
        let query = Self::insert_query();
        let mut tx = pool.begin().await?;

        let mut created = Vec::with_capacity(children.len());
        for child in children {
            let row = Self::bind_create(sqlx::query_as::<_, Scorecard>(&query), company_id, child)
                .fetch_one(&mut *tx)
                .await;
            match row {
                Ok(row) => created.push(row),
                Err(e) => {
                    // Dropping `tx` rolls the batch back.
                    tracing::warn!(
                        company_id,
                        employee_id = %child.employee_id,
                        inserted = created.len(),
                        error = %e,
                        "Child scorecard insert failed, rolling back batch"
                    );
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        tracing::debug!(company_id, count = created.len(), "Child scorecard batch committed");
        Ok(created)
    }

    fn bind_create<'q>(
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Scorecard, sqlx::postgres::PgArguments>,
        company_id: DbId,
        input: &'q CreateScorecard,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Scorecard, sqlx::postgres::PgArguments> {
        query
            .bind(company_id)
            .bind(&input.scorecard_unique_id)
            .bind(input.template_id)
            .bind(&input.employee_id)
            .bind(&input.manager_id)
            .bind(&input.parent_scorecard_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.period_start)
            .bind(input.period_end)
            .bind(&input.data)
            .bind(input.created_by)
    }

    /// Find a live scorecard by its unique id within the company.
    pub async fn find_by_unique_id(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
    ) -> Result<Option<Scorecard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scorecards
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE"
        );
        sqlx::query_as::<_, Scorecard>(&query)
            .bind(company_id)
            .bind(scorecard_unique_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of live scorecards matching the query filters.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        params: &ScorecardQuery,
    ) -> Result<Vec<Scorecard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scorecards WHERE {LIST_FILTER}
             ORDER BY {} LIMIT $5 OFFSET $6",
            params.sort.to_sql()
        );
        sqlx::query_as::<_, Scorecard>(&query)
            .bind(company_id)
            .bind(&params.employee_id)
            .bind(&params.status)
            .bind(&params.search)
            .bind(params.page.limit)
            .bind(params.page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count live scorecards matching the query filters, ignoring pagination.
    pub async fn count(
        pool: &PgPool,
        company_id: DbId,
        params: &ScorecardQuery,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM scorecards WHERE {LIST_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(company_id)
            .bind(&params.employee_id)
            .bind(&params.status)
            .bind(&params.search)
            .fetch_one(pool)
            .await
    }

    /// One page of the scorecards below `employee_id` in the parent/child
    /// hierarchy. The employee's own scorecards are excluded.
    pub async fn list_team(
        pool: &PgPool,
        company_id: DbId,
        employee_id: &str,
        params: &ScorecardQuery,
    ) -> Result<Vec<Scorecard>, sqlx::Error> {
        let query = format!(
            "{TEAM_CTE}
             SELECT {COLUMNS} FROM scorecards
             WHERE company_id = $1 AND deleted = FALSE AND employee_id <> $2
               AND scorecard_unique_id IN (SELECT scorecard_unique_id FROM team)
               AND ($3::TEXT IS NULL OR status = $3)
               AND ($4::TEXT IS NULL OR title ILIKE $4 ESCAPE '\\' OR scorecard_unique_id ILIKE $4 ESCAPE '\\')
             ORDER BY {} LIMIT $5 OFFSET $6",
            params.sort.to_sql()
        );
        sqlx::query_as::<_, Scorecard>(&query)
            .bind(company_id)
            .bind(employee_id)
            .bind(&params.status)
            .bind(&params.search)
            .bind(params.page.limit)
            .bind(params.page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count the team scorecards returned by [`Self::list_team`].
    pub async fn count_team(
        pool: &PgPool,
        company_id: DbId,
        employee_id: &str,
        params: &ScorecardQuery,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "{TEAM_CTE}
             SELECT COUNT(*) FROM scorecards
             WHERE company_id = $1 AND deleted = FALSE AND employee_id <> $2
               AND scorecard_unique_id IN (SELECT scorecard_unique_id FROM team)
               AND ($3::TEXT IS NULL OR status = $3)
               AND ($4::TEXT IS NULL OR title ILIKE $4 ESCAPE '\\' OR scorecard_unique_id ILIKE $4 ESCAPE '\\')"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(company_id)
            .bind(employee_id)
            .bind(&params.status)
            .bind(&params.search)
            .fetch_one(pool)
            .await
    }

    /// Update a live scorecard. Only non-`None` fields in `input` are applied;
    /// a present `data` replaces the stored blob.
    ///
    /// Returns `None` if no live row with the given unique id exists.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
        input: &UpdateScorecard,
    ) -> Result<Option<Scorecard>, sqlx::Error> {
        let query = format!(
            "UPDATE scorecards SET
                template_id = COALESCE($3, template_id),
                employee_id = COALESCE($4, employee_id),
                manager_id = COALESCE($5, manager_id),
                title = COALESCE($6, title),
                description = COALESCE($7, description),
                status = COALESCE($8, status),
                period_start = COALESCE($9, period_start),
                period_end = COALESCE($10, period_end),
                data = COALESCE($11, data)
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scorecard>(&query)
            .bind(company_id)
            .bind(scorecard_unique_id)
            .bind(input.template_id)
            .bind(&input.employee_id)
            .bind(&input.manager_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.period_start)
            .bind(input.period_end)
            .bind(&input.data)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a scorecard. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scorecards SET deleted = TRUE
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE",
        )
        .bind(company_id)
        .bind(scorecard_unique_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
