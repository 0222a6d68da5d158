//! Integer guard for identifier-like criteria.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::search::DatabaseEngine;

/// Largest identifier accepted by engines that reject out-of-range integer literals.
pub const PLATFORM_INT_MAX: i64 = 2_147_483_647;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{0,10}$").expect("identifier pattern is valid"));

/// Parses `raw` as a non-negative identifier of at most ten ASCII digits.
///
/// Returns `None` (no constraint) when the text is not such a number, or when it
/// exceeds [`PLATFORM_INT_MAX`] on an engine that would reject the literal.
pub fn guard_identifier(raw: &str, engine: DatabaseEngine) -> Option<i64> {
    if raw.is_empty() || !IDENTIFIER_PATTERN.is_match(raw) {
        return None;
    }
    // Ten digits always fit in an i64.
    let value: i64 = raw.parse().ok()?;
    if value > PLATFORM_INT_MAX && engine.rejects_integer_overflow() {
        log::debug!("dropping identifier {raw}: exceeds {PLATFORM_INT_MAX} on {engine}");
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_platform_maximum() {
        assert_eq!(guard_identifier("2147483647", DatabaseEngine::Postgres), Some(2_147_483_647));
    }

    #[test]
    fn drops_overflow_on_sensitive_engine() {
        assert_eq!(guard_identifier("2147483648", DatabaseEngine::Postgres), None);
        assert_eq!(guard_identifier("9999999999", DatabaseEngine::Postgres), None);
    }

    #[test]
    fn keeps_overflow_on_tolerant_engines() {
        assert_eq!(guard_identifier("2147483648", DatabaseEngine::MySql), Some(2_147_483_648));
        assert_eq!(guard_identifier("9999999999", DatabaseEngine::Sqlite), Some(9_999_999_999));
    }

    #[test]
    fn rejects_more_than_ten_digits_everywhere() {
        assert_eq!(guard_identifier("99999999999", DatabaseEngine::Postgres), None);
        assert_eq!(guard_identifier("99999999999", DatabaseEngine::MySql), None);
    }

    #[test]
    fn rejects_non_digits() {
        for raw in ["", "12a", "-1", "1.5", " 12", "１２"] {
            assert_eq!(guard_identifier(raw, DatabaseEngine::MySql), None, "input {raw:?}");
        }
    }

    #[test]
    fn keeps_leading_zeros_as_number() {
        assert_eq!(guard_identifier("0042", DatabaseEngine::Postgres), Some(42));
        assert_eq!(guard_identifier("0", DatabaseEngine::Postgres), Some(0));
    }
}
