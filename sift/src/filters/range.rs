//! Resolution of paired start/end criteria into at most two range bounds.
//!
//! Every date-bearing range can be given either as a precise timestamp
//! (`*_datetime_start` / `*_datetime_end`) or as a calendar date
//! (`*_date_start` / `*_date_end`). Timestamps win over dates for the same
//! side. A date-only end bound covers the whole day: it is advanced to the
//! next midnight and compared with `<`.

use crate::criteria::SearchCriteria;
use crate::search::{Comparator, ColumnExpr, Predicate, Value};

/// Names of the four raw criteria feeding one logical date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeKeys {
    pub precise_start: Option<&'static str>,
    pub date_start: &'static str,
    pub precise_end: Option<&'static str>,
    pub date_end: &'static str,
}

impl DateRangeKeys {
    /// Keys that accept both a timestamp and a date variant.
    pub const fn new(
        precise_start: &'static str,
        date_start: &'static str,
        precise_end: &'static str,
        date_end: &'static str,
    ) -> Self {
        Self {
            precise_start: Some(precise_start),
            date_start,
            precise_end: Some(precise_end),
            date_end,
        }
    }

    /// Keys that only accept calendar dates.
    pub const fn dates_only(date_start: &'static str, date_end: &'static str) -> Self {
        Self {
            precise_start: None,
            date_start,
            precise_end: None,
            date_end,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &'static str> {
        [self.precise_start, Some(self.date_start), self.precise_end, Some(self.date_end)]
            .into_iter()
            .flatten()
    }
}

/// One side of a resolved range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub column: ColumnExpr,
    pub comparator: Comparator,
    pub value: Value,
}

impl RangeBound {
    pub fn into_predicate(self) -> Predicate {
        Predicate::Compare {
            column: self.column,
            comparator: self.comparator,
            value: self.value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRange {
    pub lower: Option<RangeBound>,
    pub upper: Option<RangeBound>,
}

impl ResolvedRange {
    pub fn into_predicates(self) -> impl Iterator<Item = Predicate> {
        [self.lower, self.upper].into_iter().flatten().map(RangeBound::into_predicate)
    }
}

/// Resolves the date range named by `keys` against `column`.
pub fn resolve_date_range(
    criteria: &SearchCriteria,
    keys: &DateRangeKeys,
    column: &ColumnExpr,
) -> ResolvedRange {
    let lower = keys
        .precise_start
        .and_then(|key| criteria.datetime(key))
        .map(Value::DateTime)
        .or_else(|| criteria.date(keys.date_start).map(Value::Date))
        .map(|value| RangeBound {
            column: column.clone(),
            comparator: Comparator::Gte,
            value,
        });

    let upper = keys
        .precise_end
        .and_then(|key| criteria.datetime(key))
        .map(Value::DateTime)
        .or_else(|| inclusive_date_end(criteria, keys.date_end))
        .map(|value| RangeBound {
            column: column.clone(),
            comparator: Comparator::Lt,
            value,
        });

    ResolvedRange { lower, upper }
}

fn inclusive_date_end(criteria: &SearchCriteria, key: &str) -> Option<Value> {
    let date = criteria.date(key)?;
    match date.succ_opt() {
        Some(next) => Some(Value::Date(next)),
        None => {
            log::debug!("ignoring criterion {key}: no calendar day follows {date}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const UPDATE: DateRangeKeys = DateRangeKeys::new(
        "update_datetime_start",
        "update_date_start",
        "update_datetime_end",
        "update_date_end",
    );

    fn column() -> ColumnExpr {
        ColumnExpr::column("c.update_date")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_only_end_covers_the_whole_day() {
        let criteria = SearchCriteria::new().with("update_date_end", "2024-01-31");
        let range = resolve_date_range(&criteria, &UPDATE, &column());

        assert!(range.lower.is_none());
        let upper = range.upper.expect("upper bound");
        assert_eq!(upper.comparator, Comparator::Lt);
        assert_eq!(upper.value, Value::Date(date(2024, 2, 1)));
    }

    #[test]
    fn timestamp_end_is_used_as_given() {
        let criteria = SearchCriteria::new().with("update_datetime_end", "2024-01-31T10:00:00");
        let range = resolve_date_range(&criteria, &UPDATE, &column());

        let upper = range.upper.expect("upper bound");
        assert_eq!(upper.into_predicate().to_string(), "c.update_date < 2024-01-31T10:00:00");
    }

    #[test]
    fn timestamp_wins_over_date_for_each_side() {
        let criteria = SearchCriteria::new()
            .with("update_datetime_start", "2024-01-01T09:00:00")
            .with("update_date_start", "2023-12-01")
            .with("update_datetime_end", "2024-01-31T18:00:00")
            .with("update_date_end", "2024-03-01");
        let predicates: Vec<String> = resolve_date_range(&criteria, &UPDATE, &column())
            .into_predicates()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(
            predicates,
            vec![
                "c.update_date >= 2024-01-01T09:00:00",
                "c.update_date < 2024-01-31T18:00:00"
            ]
        );
    }

    #[test]
    fn date_start_is_inclusive_and_unadjusted() {
        let criteria = SearchCriteria::new().with("update_date_start", "2024-01-01");
        let lower = resolve_date_range(&criteria, &UPDATE, &column()).lower.expect("lower bound");

        assert_eq!(lower.comparator, Comparator::Gte);
        assert_eq!(lower.value, Value::Date(date(2024, 1, 1)));
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_date() {
        let criteria = SearchCriteria::new()
            .with("update_datetime_end", "yesterday")
            .with("update_date_end", "2024-02-28");
        let upper = resolve_date_range(&criteria, &UPDATE, &column()).upper.expect("upper bound");

        assert_eq!(upper.value, Value::Date(date(2024, 2, 29)));
    }

    #[test]
    fn dates_only_keys_ignore_timestamp_variants() {
        let keys = DateRangeKeys::dates_only("shipping_date_start", "shipping_date_end");
        let criteria = SearchCriteria::new().with("shipping_date_end", "2024-12-31");
        let upper = resolve_date_range(&criteria, &keys, &column()).upper.expect("upper bound");

        assert_eq!(upper.value, Value::Date(date(2025, 1, 1)));
        assert_eq!(keys.all().count(), 2);
    }

    #[test]
    fn nothing_supplied_resolves_to_no_bounds() {
        let range = resolve_date_range(&SearchCriteria::new(), &UPDATE, &column());
        assert_eq!(range, ResolvedRange::default());
    }
}
