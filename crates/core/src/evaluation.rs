//! Scorecard evaluation rules and statistics.

use serde::Serialize;

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_SUBMITTED, STATUS_APPROVED, STATUS_REJECTED];

/// Statuses counted as completed in [`EvaluationStats`].
pub const COMPLETED_STATUSES: &[&str] = &[STATUS_SUBMITTED, STATUS_APPROVED];

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

/// The rejected value is not echoed back.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

pub fn validate_grade(grade: f64) -> Result<(), CoreError> {
    if grade.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&grade) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Grade must be a number between {MIN_GRADE} and {MAX_GRADE}"
        )))
    }
}

/// Aggregate evaluation counts for one scorecard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationStats {
    pub total_evaluations: i64,
    pub completed_evaluations: i64,
    pub draft_evaluations: i64,
    /// Mean of non-null grades rounded to two decimals.
    pub average_grade: Option<f64>,
}

impl EvaluationStats {
    pub fn new(total: i64, completed: i64, draft: i64, average_grade: Option<f64>) -> Self {
        Self {
            total_evaluations: total,
            completed_evaluations: completed,
            draft_evaluations: draft,
            average_grade: average_grade.map(round_to_cents),
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
