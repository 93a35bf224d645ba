//! Page/limit clamping and sort resolution for list endpoints.
//!
//! List endpoints never fail on bad paging input: out-of-range or
//! non-numeric values fall back to defaults, and sort fields are resolved
//! through a fixed allow-list so request text never reaches an SQL
//! identifier position.

use serde_json::Value;

use crate::coerce::as_i64;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Records per page when `limit` is missing or not positive.
pub const DEFAULT_LIMIT: i64 = 10;

/// Hard upper bound on records per page.
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Page requests
// ---------------------------------------------------------------------------

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp raw values: `page < 1` becomes 1, `limit <= 0` becomes
    /// [`DEFAULT_LIMIT`], `limit > max` becomes `max`.
    pub fn new(page: Option<i64>, limit: Option<i64>, max: i64) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(max);
        Self { page, limit }
    }

    /// Build from loosely-typed request values, capped at [`MAX_LIMIT`].
    pub fn from_values(page: Option<&Value>, limit: Option<&Value>) -> Self {
        Self::new(page.and_then(as_i64), limit.and_then(as_i64), MAX_LIMIT)
    }

    /// Row offset for SQL `OFFSET`. Saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort direction. Anything other than `asc` (any case) is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Map a user-facing sort field onto a column expression.
///
/// `allowed` pairs request names with SQL expressions. Unknown or missing
/// names resolve to `default`.
pub fn resolve_sort_column(
    requested: Option<&str>,
    allowed: &[(&str, &'static str)],
    default: &'static str,
) -> &'static str {
    let Some(requested) = requested.map(str::trim) else {
        return default;
    };
    allowed
        .iter()
        .find(|(name, _)| *name == requested)
        .map(|(_, column)| *column)
        .unwrap_or(default)
}

/// A resolved `ORDER BY` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub order: SortOrder,
}

impl SortSpec {
    /// Render as an `ORDER BY` body. `id` breaks ties so paging is stable.
    pub fn to_sql(&self) -> String {
        format!("{} {}, id {}", self.column, self.order.as_sql(), self.order.as_sql())
    }
}
