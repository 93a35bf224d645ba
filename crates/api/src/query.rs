//! Shared list parameters for API handlers.
//!
//! Paging, sorting and search arrive under several spellings
//! (`sort_field` / `sortField`, ...). They are read once here so every list
//! handler resolves them the same way.

use trakker_core::pagination::{resolve_sort_column, PageRequest, SortOrder, SortSpec};
use trakker_core::search::build_like_pattern;

use crate::payload::Payload;

/// Resolved paging, sort and search for one list request.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: PageRequest,
    pub sort: SortSpec,
    /// `ILIKE` pattern, `None` when no search was given.
    pub search: Option<String>,
}

impl ListParams {
    /// Read `page`, `limit`, `search`, `sort_field` and `sort_order` from
    /// the payload. Sort fields outside `sort_fields` fall back to
    /// `default_sort`.
    pub fn from_payload(
        payload: &Payload,
        sort_fields: &[(&str, &'static str)],
        default_sort: &'static str,
    ) -> Self {
        let page = PageRequest::from_values(payload.get("page"), payload.get("limit"));
        let column = resolve_sort_column(
            payload.text(&["sort_field", "sortField"]).as_deref(),
            sort_fields,
            default_sort,
        );
        let order = SortOrder::parse(payload.text(&["sort_order", "sortOrder"]).as_deref());
        let search = build_like_pattern(payload.text(&["search"]).as_deref());

        Self {
            page,
            sort: SortSpec { column, order },
            search,
        }
    }
}
