//! Lenient readers over loosely-typed request values.
//!
//! Request parameters arrive as `serde_json::Value`s from JSON bodies, form
//! bodies and query strings alike. Scalars are accepted either natively or
//! as strings; anything else (arrays, objects, booleans, null) reads as
//! absent so that type-confused input is reported as a missing field rather
//! than failing deeper in the stack.

use serde_json::Value;

/// Read a non-empty, trimmed string. Numbers are rendered to text.
///
/// NUL characters are removed; Postgres cannot store them.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|&c| c != '\0').collect();
            let trimmed = cleaned.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read an integer from a JSON integer, an integral float or a numeric string.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a finite float from a JSON number or a numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Whether the value counts as "not provided" (missing, null or blank).
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
