//! Case-insensitive substring search helpers.

use crate::sanitize::escape_html;

/// Longest search term honoured; longer input is truncated.
pub const MAX_SEARCH_LEN: usize = 200;

/// Build an `ILIKE ... ESCAPE '\'` pattern from raw search input.
///
/// Returns `None` for empty or whitespace-only input, meaning "no filter".
/// The term is HTML-escaped first because stored text is escaped on write,
/// then `\`, `%` and `_` are escaped so they match literally.
pub fn build_like_pattern(raw: Option<&str>) -> Option<String> {
    let term = raw.map(str::trim).filter(|t| !t.is_empty())?;
    let term: String = term.chars().take(MAX_SEARCH_LEN).collect();
    let term = escape_html(&term);

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_is_no_filter() {
        assert_eq!(build_like_pattern(None), None);
        assert_eq!(build_like_pattern(Some("   ")), None);
    }

    #[test]
    fn wraps_term_in_wildcards() {
        assert_eq!(build_like_pattern(Some(" Lead ")), Some("%Lead%".to_string()));
    }

    #[test]
    fn wildcards_match_literally() {
        assert_eq!(
            build_like_pattern(Some("100%_done\\")),
            Some("%100\\%\\_done\\\\%".to_string())
        );
    }

    #[test]
    fn markup_is_escaped_to_match_stored_text() {
        assert_eq!(build_like_pattern(Some("R&D")), Some("%R&amp;D%".to_string()));
    }

    #[test]
    fn long_terms_are_truncated() {
        let long = "x".repeat(1000);
        let pattern = build_like_pattern(Some(&long)).unwrap();
        assert_eq!(pattern.len(), MAX_SEARCH_LEN + 2);
    }
}
