//! Repository for the `scorecard_evaluations` table.

use sqlx::PgPool;
use trakker_core::evaluation::{COMPLETED_STATUSES, STATUS_DRAFT};
use trakker_core::pagination::PageRequest;
use trakker_core::types::DbId;

use crate::models::evaluation::{CreateEvaluation, EvaluationAggregate, ScorecardEvaluation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, scorecard_unique_id, evaluator_id, evaluator_username, \
                       evaluated_employee_id, evaluation_data, grade, notes, evaluation_date, \
                       status, deleted, created, modified";

/// Provides CRUD operations for scorecard evaluations.
pub struct EvaluationRepo;

impl EvaluationRepo {
    /// Insert a new evaluation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateEvaluation,
    ) -> Result<ScorecardEvaluation, sqlx::Error> {
        let query = format!(
            "INSERT INTO scorecard_evaluations
                (company_id, scorecard_unique_id, evaluator_id, evaluator_username,
                 evaluated_employee_id, evaluation_data, grade, notes, evaluation_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScorecardEvaluation>(&query)
            .bind(company_id)
            .bind(&input.scorecard_unique_id)
            .bind(input.evaluator_id)
            .bind(&input.evaluator_username)
            .bind(&input.evaluated_employee_id)
            .bind(&input.evaluation_data)
            .bind(input.grade)
            .bind(&input.notes)
            .bind(input.evaluation_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a live evaluation by ID within the company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<ScorecardEvaluation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scorecard_evaluations
             WHERE id = $1 AND company_id = $2 AND deleted = FALSE"
        );
        sqlx::query_as::<_, ScorecardEvaluation>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of a scorecard's live evaluations, newest evaluation first.
    pub async fn list_for_scorecard(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
        page: PageRequest,
    ) -> Result<Vec<ScorecardEvaluation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scorecard_evaluations
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE
             ORDER BY evaluation_date DESC, created DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ScorecardEvaluation>(&query)
            .bind(company_id)
            .bind(scorecard_unique_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_scorecard(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scorecard_evaluations
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE",
        )
        .bind(company_id)
        .bind(scorecard_unique_id)
        .fetch_one(pool)
        .await
    }

    /// Counts by status and the mean grade over a scorecard's live evaluations.
    pub async fn aggregate(
        pool: &PgPool,
        company_id: DbId,
        scorecard_unique_id: &str,
    ) -> Result<EvaluationAggregate, sqlx::Error> {
        sqlx::query_as::<_, EvaluationAggregate>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = ANY($3)) AS completed,
                COUNT(*) FILTER (WHERE status = $4) AS draft,
                AVG(grade) AS average_grade
             FROM scorecard_evaluations
             WHERE company_id = $1 AND scorecard_unique_id = $2 AND deleted = FALSE",
        )
        .bind(company_id)
        .bind(scorecard_unique_id)
        .bind(COMPLETED_STATUSES)
        .bind(STATUS_DRAFT)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete an evaluation. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scorecard_evaluations SET deleted = TRUE
             WHERE id = $1 AND company_id = $2 AND deleted = FALSE",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
