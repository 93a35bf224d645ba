//! Scorecard evaluation model and DTOs.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use trakker_core::types::{Date, DbId, Timestamp};

/// A row from the `scorecard_evaluations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScorecardEvaluation {
    pub id: DbId,
    pub company_id: DbId,
    pub scorecard_unique_id: String,
    pub evaluator_id: Option<DbId>,
    pub evaluator_username: String,
    pub evaluated_employee_id: Option<String>,
    pub evaluation_data: Option<Value>,
    pub grade: Option<f64>,
    pub notes: Option<String>,
    pub evaluation_date: Date,
    pub status: String,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
}

/// DTO for recording an evaluation.
#[derive(Debug, Clone)]
pub struct CreateEvaluation {
    pub scorecard_unique_id: String,
    pub evaluator_id: DbId,
    pub evaluator_username: String,
    pub evaluated_employee_id: Option<String>,
    pub evaluation_data: Option<Value>,
    pub grade: Option<f64>,
    pub notes: Option<String>,
    pub evaluation_date: Date,
    pub status: String,
}

/// Aggregates backing the evaluation statistics endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct EvaluationAggregate {
    pub total: i64,
    pub completed: i64,
    pub draft: i64,
    pub average_grade: Option<f64>,
}
