//! Caller-assigned record identifiers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rand::distr::Alphanumeric;
use rand::Rng;
use regex::Regex;

/// Longest accepted unique id.
pub const MAX_UNIQUE_ID_LEN: usize = 255;

const UNIQUE_ID_PATTERN: &str = r"^[A-Za-z0-9_.:\-]+$";

static UNIQUE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UNIQUE_ID_PATTERN).expect("valid regex"));

/// Prefix of generated child scorecard ids.
pub const SCORECARD_ID_PREFIX: &str = "scid";

/// Length of the random suffix of generated ids.
const RANDOM_SUFFIX_LEN: usize = 8;

/// Whether `id` is a syntactically valid unique id: non-empty, at most
/// [`MAX_UNIQUE_ID_LEN`] bytes, and limited to letters, digits and `_ . : -`.
pub fn is_valid_unique_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_UNIQUE_ID_LEN && UNIQUE_ID_RE.is_match(id)
}

/// Generate a scorecard id of the form `scid-YYYYMMDD-xxxxxxxx`.
pub fn generate_scorecard_id(date: NaiveDate) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{SCORECARD_ID_PREFIX}-{}-{suffix}", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        for id in ["rl-test-1", "SC_2024.Q1", "emp:42", "7"] {
            assert!(is_valid_unique_id(id), "{id} should be valid");
        }
    }

    #[test]
    fn rejects_hostile_or_empty_ids() {
        for id in ["", "a b", "<script>", "x'; DROP TABLE scorecards;--", "../../etc/passwd"] {
            assert!(!is_valid_unique_id(id), "{id} should be invalid");
        }
        assert!(!is_valid_unique_id(&"a".repeat(MAX_UNIQUE_ID_LEN + 1)));
    }

    #[test]
    fn generated_ids_are_valid_and_dated() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
        let id = generate_scorecard_id(date);
        assert!(id.starts_with("scid-20241220-"));
        assert_eq!(id.len(), "scid-20241220-".len() + RANDOM_SUFFIX_LEN);
        assert!(is_valid_unique_id(&id));
        assert_ne!(id, generate_scorecard_id(date));
    }
}
