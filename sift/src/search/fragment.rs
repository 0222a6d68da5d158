//! Declarative field-to-fragment mapping.
//!
//! A search domain is described by a static slice of [`Fragment`]s. Each
//! fragment reads its own criteria and contributes zero or more predicates to
//! the root conjunction; fragments never look at each other, so the order in
//! which they run does not change the result.

use std::borrow::Cow;

use crate::criteria::{CriterionValue, SearchCriteria};
use crate::filters::{
    DateRangeKeys, digits_only, guard_identifier, resolve_date_range, strip_whitespace,
};
use crate::search::{
    ColumnExpr, DatabaseEngine, JoinDef, Predicate, SearchQuery, StatusExclusion, Value,
};

/// Static column reference used in domain tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Col {
    Field(&'static str),
    Concat(&'static [&'static str]),
    ConcatCoalesced(&'static [&'static str]),
    Month(&'static str),
}

impl Col {
    pub fn expr(&self) -> ColumnExpr {
        match *self {
            Col::Field(name) => ColumnExpr::column(name),
            Col::Concat(parts) => {
                ColumnExpr::Concat(parts.iter().map(|p| (*p).to_string()).collect())
            }
            Col::ConcatCoalesced(parts) => {
                ColumnExpr::ConcatCoalesced(parts.iter().map(|p| (*p).to_string()).collect())
            }
            Col::Month(name) => ColumnExpr::Month(name.to_string()),
        }
    }
}

/// One branch of a multi-field free-text match.
#[derive(Debug, Clone, Copy)]
pub enum MultiBranch {
    /// Substring match against the whitespace-stripped input.
    Cleaned(Col),
    /// Substring match against the input exactly as typed; whitespace matters here.
    Raw(Col),
}

/// How one recognized criterion (or criterion pair) becomes predicates.
#[derive(Debug, Clone, Copy)]
pub enum Fragment {
    /// `column = id`, when the value passes the identifier guard.
    IdEquals { key: &'static str, column: &'static str },
    /// `column = text`.
    TextEquals { key: &'static str, column: &'static str },
    /// `column >= start` / `column <= end`, each side guarded.
    IdRange {
        start: &'static str,
        end: &'static str,
        column: &'static str,
    },
    /// Disjunction of an optional identifier branch and substring branches.
    MultiText {
        key: &'static str,
        id_column: Option<&'static str>,
        branches: &'static [MultiBranch],
    },
    /// `column LIKE %text%`, optionally after stripping whitespace.
    Contains {
        key: &'static str,
        column: Col,
        strip_whitespace: bool,
    },
    /// Digits of the input matched inside the concatenated phone segments.
    Phone {
        key: &'static str,
        columns: &'static [&'static str],
    },
    /// `column = reference` for a single truthy reference value.
    Reference { key: &'static str, column: Col },
    /// `column IN (references)`.
    ReferenceSet { key: &'static str, column: &'static str },
    /// Inclusive numeric bounds.
    NumberRange {
        start: &'static str,
        end: &'static str,
        column: &'static str,
    },
    /// Date or timestamp bounds, see [`crate::filters::range`].
    DateRange { keys: DateRangeKeys, column: &'static str },
    /// Exactly one checked flag maps to `IS NULL` / `IS NOT NULL`.
    MailFlag {
        key: &'static str,
        column: &'static str,
        unsent: &'static str,
        sent: &'static str,
    },
    /// Substring match on a joined collection, scoped to non-transient parents.
    RelatedText {
        key: &'static str,
        joins: &'static [JoinDef],
        column: &'static str,
        scoped_exclusion: Option<StatusExclusion>,
    },
}

/// Inputs shared by every fragment of one composition.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub criteria: &'a SearchCriteria,
    pub engine: DatabaseEngine,
}

impl Fragment {
    /// Criteria keys this fragment reads.
    pub fn keys(&self) -> Vec<&'static str> {
        match *self {
            Fragment::IdEquals { key, .. }
            | Fragment::TextEquals { key, .. }
            | Fragment::MultiText { key, .. }
            | Fragment::Contains { key, .. }
            | Fragment::Phone { key, .. }
            | Fragment::Reference { key, .. }
            | Fragment::ReferenceSet { key, .. }
            | Fragment::MailFlag { key, .. }
            | Fragment::RelatedText { key, .. } => vec![key],
            Fragment::IdRange { start, end, .. } | Fragment::NumberRange { start, end, .. } => {
                vec![start, end]
            }
            Fragment::DateRange { keys, .. } => keys.all().collect(),
        }
    }

    /// Short description of the match performed, for listings.
    pub fn describe(&self) -> &'static str {
        match self {
            Fragment::IdEquals { .. } => "identifier equals",
            Fragment::TextEquals { .. } => "text equals",
            Fragment::IdRange { .. } => "identifier range",
            Fragment::MultiText { .. } => "multi-field fuzzy text",
            Fragment::Contains { .. } => "substring",
            Fragment::Phone { .. } => "phone digits substring",
            Fragment::Reference { .. } => "reference equals",
            Fragment::ReferenceSet { .. } => "reference in set",
            Fragment::NumberRange { .. } => "numeric range",
            Fragment::DateRange { .. } => "date/time range",
            Fragment::MailFlag { .. } => "mail sent flag",
            Fragment::RelatedText { .. } => "related item substring",
        }
    }

    /// Adds this fragment's predicates (and any joins it needs) to `query`.
    pub fn contribute(&self, ctx: &ComposeContext<'_>, query: &mut SearchQuery) {
        let criteria = ctx.criteria;
        match *self {
            Fragment::IdEquals { key, column } => {
                if let Some(id) = guarded_id(ctx, key) {
                    query.and_where(Predicate::eq(column, id));
                }
            }
            Fragment::TextEquals { key, column } => {
                if let Some(text) = criteria.text(key) {
                    query.and_where(Predicate::eq(column, text.into_owned()));
                }
            }
            Fragment::IdRange { start, end, column } => {
                if let Some(id) = guarded_id(ctx, start) {
                    query.and_where(Predicate::gte(column, id));
                }
                if let Some(id) = guarded_id(ctx, end) {
                    query.and_where(Predicate::lte(column, id));
                }
            }
            Fragment::MultiText {
                key,
                id_column,
                branches,
            } => {
                if let Some(predicate) = multi_text(ctx, key, id_column, branches, query) {
                    query.and_where(predicate);
                }
            }
            Fragment::Contains {
                key,
                column,
                strip_whitespace: strip,
            } => {
                let Some(raw) = criteria.text(key) else {
                    return;
                };
                let needle = if strip {
                    strip_whitespace(&raw)
                } else {
                    raw.into_owned()
                };
                if needle.trim().is_empty() {
                    return;
                }
                if strip {
                    query.record_normalized(key, needle.clone());
                }
                query.and_where(Predicate::contains(column.expr(), needle));
            }
            Fragment::Phone { key, columns } => {
                let Some(raw) = criteria.text(key) else {
                    return;
                };
                let digits = digits_only(&raw);
                if digits.is_empty() {
                    log::debug!("ignoring criterion {key}: no digits in {raw:?}");
                    return;
                }
                query.record_normalized(key, digits.clone());
                query.and_where(Predicate::contains(columns, digits));
            }
            Fragment::Reference { key, column } => {
                if let Some(value) = criteria
                    .get(key)
                    .filter(|v| is_truthy(v))
                    .and_then(resolve_reference)
                {
                    query.and_where(Predicate::eq(column.expr(), value));
                }
            }
            Fragment::ReferenceSet { key, column } => {
                let mut values: Vec<Value> = Vec::new();
                for value in criteria.list(key).into_iter().filter_map(resolve_reference) {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                if !values.is_empty() {
                    query.and_where(Predicate::in_list(column, values));
                }
            }
            Fragment::NumberRange { start, end, column } => {
                if let Some(value) = numeric(criteria, start) {
                    query.and_where(Predicate::gte(column, value));
                }
                if let Some(value) = numeric(criteria, end) {
                    query.and_where(Predicate::lte(column, value));
                }
            }
            Fragment::DateRange { keys, column } => {
                let range = resolve_date_range(criteria, &keys, &ColumnExpr::column(column));
                for predicate in range.into_predicates() {
                    query.and_where(predicate);
                }
            }
            Fragment::MailFlag {
                key,
                column,
                unsent,
                sent,
            } => {
                if let Some(predicate) = mail_flag(criteria, key, column, unsent, sent) {
                    query.and_where(predicate);
                }
            }
            Fragment::RelatedText {
                key,
                joins,
                column,
                scoped_exclusion,
            } => {
                let Some(text) = criteria.text(key) else {
                    return;
                };
                for join in joins {
                    query.join(join.to_join());
                }
                query.and_where(Predicate::contains(column, text.into_owned()));
                if let Some(exclusion) =
                    scoped_exclusion.and_then(|exclusion| exclusion.predicate())
                {
                    query.and_where(exclusion);
                }
            }
        }
    }
}

fn guarded_id(ctx: &ComposeContext<'_>, key: &str) -> Option<i64> {
    let raw = ctx.criteria.text(key)?;
    guard_identifier(raw.trim(), ctx.engine)
}

fn multi_text(
    ctx: &ComposeContext<'_>,
    key: &str,
    id_column: Option<&'static str>,
    branches: &[MultiBranch],
    query: &mut SearchQuery,
) -> Option<Predicate> {
    let raw = ctx.criteria.text(key)?;
    let cleaned = strip_whitespace(&raw);
    if cleaned.is_empty() {
        return None;
    }
    query.record_normalized(key, cleaned.clone());

    let mut disjunction = Vec::with_capacity(branches.len() + 1);
    if let Some(column) = id_column
        && let Some(id) = guard_identifier(&cleaned, ctx.engine)
    {
        disjunction.push(Predicate::eq(column, id));
    }
    for branch in branches {
        let predicate = match branch {
            MultiBranch::Cleaned(column) => Predicate::contains(column.expr(), cleaned.clone()),
            MultiBranch::Raw(column) => Predicate::contains(column.expr(), raw.to_string()),
        };
        disjunction.push(predicate);
    }
    Some(Predicate::or(disjunction))
}

fn mail_flag(
    criteria: &SearchCriteria,
    key: &str,
    column: &'static str,
    unsent: &str,
    sent: &str,
) -> Option<Predicate> {
    let mut checked: Vec<Cow<'_, str>> = Vec::new();
    for flag in criteria.list(key).into_iter().filter_map(CriterionValue::as_text) {
        if !checked.contains(&flag) {
            checked.push(flag);
        }
    }
    // Both or neither checked: no opinion.
    let [flag] = checked.as_slice() else {
        return None;
    };
    if flag.trim() == unsent {
        Some(Predicate::is_null(column))
    } else if flag.trim() == sent {
        Some(Predicate::is_not_null(column))
    } else {
        log::debug!("ignoring criterion {key}: unknown flag {flag:?}");
        None
    }
}

/// Form-style truthiness: null, `false`, `0`, `""` and `"0"` are falsy.
fn is_truthy(value: &CriterionValue) -> bool {
    match value {
        CriterionValue::Null => false,
        CriterionValue::Bool(flag) => *flag,
        CriterionValue::Integer(number) => *number != 0,
        CriterionValue::Float(number) => *number != 0.0,
        CriterionValue::Text(text) => !text.trim().is_empty() && text.trim() != "0",
        CriterionValue::List(items) => !items.is_empty(),
        CriterionValue::Other(_) => false,
    }
}

/// Resolves a reference (master id) to a bindable value.
fn resolve_reference(value: &CriterionValue) -> Option<Value> {
    match value {
        CriterionValue::Integer(_) | CriterionValue::Float(_) => value.as_integer().map(Value::Int),
        CriterionValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else if let Ok(id) = text.parse::<i64>() {
                Some(Value::Int(id))
            } else {
                Some(Value::Text(text.to_string()))
            }
        }
        CriterionValue::Null
        | CriterionValue::Bool(_)
        | CriterionValue::List(_)
        | CriterionValue::Other(_) => None,
    }
}

fn numeric(criteria: &SearchCriteria, key: &str) -> Option<Value> {
    let raw = criteria.text(key)?;
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(Value::Int(value));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(Value::Float(value)),
        _ => {
            log::debug!("ignoring criterion {key}: {raw:?} is not a number");
            None
        }
    }
}
