use chrono::{DateTime, NaiveDate};

use crate::error::CoreError;

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep only their date part. `field` names the parameter in the
/// error message.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    Err(CoreError::Validation(format!(
        "Invalid {field}: expected a date in YYYY-MM-DD format"
    )))
}
