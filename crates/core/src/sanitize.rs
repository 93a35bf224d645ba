//! HTML escaping of user-supplied text before it is stored.
//!
//! Stored strings are echoed back by read endpoints and rendered by browser
//! clients, so markup is neutralized at write time. NUL characters are
//! dropped because Postgres rejects them in `TEXT` and `JSONB` values.

use serde_json::Value;

/// Escape `& < > " '` as HTML entities and drop NUL characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\0' => {}
            other => out.push(other),
        }
    }
    out
}

/// Escape every string leaf and every object key of a JSON value.
pub fn escape_json_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_html(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(escape_json_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (escape_html(&k), escape_json_strings(v)))
                .collect(),
        ),
        other => other,
    }
}
