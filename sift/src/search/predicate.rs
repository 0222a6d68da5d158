//! Query-builder independent predicate tree.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A bound operand. Values are always passed to the store as parameters,
/// never spliced into query text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Column side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum ColumnExpr {
    Column(String),
    /// `CONCAT(a, b, ...)`
    Concat(Vec<String>),
    /// `CONCAT(COALESCE(a, ''), COALESCE(b, ''), ...)`, for optional parts.
    ConcatCoalesced(Vec<String>),
    /// Month number (1-12) of a date column.
    Month(String),
}

impl ColumnExpr {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }
}

impl From<&str> for ColumnExpr {
    fn from(value: &str) -> Self {
        Self::Column(value.to_string())
    }
}

impl fmt::Display for ColumnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Concat(parts) => write!(f, "concat({})", parts.join(", ")),
            Self::ConcatCoalesced(parts) => write!(f, "concat_coalesce({})", parts.join(", ")),
            Self::Month(name) => write!(f, "month({name})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "<")]
    Lt,
}

impl Comparator {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gte => ">=",
            Comparator::Lte => "<=",
            Comparator::Lt => "<",
        }
    }
}

/// A composable predicate over stored records.
///
/// Leaves compare a column expression against bound values; `And` and `Or`
/// combine children. A search's root is always an `And`.
///
/// # Examples
///
/// ```
/// use sift::search::Predicate;
///
/// let name_or_email = Predicate::or([
///     Predicate::contains(["c.name01", "c.name02"].as_slice(), "yamada"),
///     Predicate::contains("c.email", "yamada"),
/// ]);
///
/// let root = Predicate::and([
///     name_or_email,
///     Predicate::in_list("c.sex_id", [1, 2]),
/// ]);
/// assert_eq!(
///     root.to_string(),
///     "((concat(c.name01, c.name02) LIKE %yamada% OR c.email LIKE %yamada%) AND c.sex_id IN (1, 2))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    // Leaf predicates
    Compare {
        column: ColumnExpr,
        comparator: Comparator,
        value: Value,
    },
    /// Substring match; `needle` is the literal text, wildcards are added on render.
    Contains {
        column: ColumnExpr,
        needle: String,
    },
    In {
        column: ColumnExpr,
        values: Vec<Value>,
    },
    NotIn {
        column: ColumnExpr,
        values: Vec<Value>,
    },
    IsNull {
        column: ColumnExpr,
    },
    IsNotNull {
        column: ColumnExpr,
    },
    // Composite predicates
    And {
        children: Vec<Predicate>,
    },
    Or {
        children: Vec<Predicate>,
    },
}

impl Predicate {
    // ========== Leaf Constructors ==========

    #[inline]
    pub fn compare(
        column: impl Into<ColumnExpr>,
        comparator: Comparator,
        value: impl Into<Value>,
    ) -> Self {
        Self::Compare {
            column: column.into(),
            comparator,
            value: value.into(),
        }
    }

    #[inline]
    pub fn eq(column: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparator::Eq, value)
    }

    #[inline]
    pub fn gte(column: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparator::Gte, value)
    }

    #[inline]
    pub fn lte(column: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparator::Lte, value)
    }

    #[inline]
    pub fn lt(column: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparator::Lt, value)
    }

    #[inline]
    pub fn contains(column: impl Into<ColumnExpr>, needle: impl Into<String>) -> Self {
        Self::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    #[inline]
    pub fn in_list<V: Into<Value>>(
        column: impl Into<ColumnExpr>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn not_in<V: Into<Value>>(
        column: impl Into<ColumnExpr>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::NotIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn is_null(column: impl Into<ColumnExpr>) -> Self {
        Self::IsNull { column: column.into() }
    }

    #[inline]
    pub fn is_not_null(column: impl Into<ColumnExpr>) -> Self {
        Self::IsNotNull { column: column.into() }
    }

    // ========== Composite Constructors ==========

    #[inline]
    pub fn and(children: impl IntoIterator<Item = Predicate>) -> Self {
        Self::And {
            children: children.into_iter().collect(),
        }
    }

    #[inline]
    pub fn or(children: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or {
            children: children.into_iter().collect(),
        }
    }

    /// Number of leaf predicates in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And { children } | Self::Or { children } => {
                children.iter().map(Self::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

impl From<&[&str]> for ColumnExpr {
    fn from(parts: &[&str]) -> Self {
        match parts {
            [single] => Self::Column((*single).to_string()),
            _ => Self::Concat(parts.iter().map(|part| (*part).to_string()).collect()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                column,
                comparator,
                value,
            } => write!(f, "{column} {} {value}", comparator.as_str()),
            Self::Contains { column, needle } => write!(f, "{column} LIKE %{needle}%"),
            Self::In { column, values } => write!(f, "{column} IN ({})", join_values(values)),
            Self::NotIn { column, values } => {
                write!(f, "{column} NOT IN ({})", join_values(values))
            }
            Self::IsNull { column } => write!(f, "{column} IS NULL"),
            Self::IsNotNull { column } => write!(f, "{column} IS NOT NULL"),
            Self::And { children } => write_group(f, children, " AND "),
            Self::Or { children } => write_group(f, children, " OR "),
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Predicate], separator: &str) -> fmt::Result {
    match children {
        [] => Ok(()),
        [single] => write!(f, "{single}"),
        _ => {
            f.write_str("(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(separator)?;
                }
                write!(f, "{child}")?;
            }
            f.write_str(")")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bound_displays_without_time() {
        let bound = Predicate::lt("o.update_date", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(bound.to_string(), "o.update_date < 2024-02-01");
    }

    #[test]
    fn timestamp_bound_displays_seconds() {
        let instant = NaiveDate::from_ymd_opt(2024, 1, 31)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        assert_eq!(
            Predicate::lt("o.update_date", instant).to_string(),
            "o.update_date < 2024-01-31T10:00:00"
        );
    }

    #[test]
    fn or_with_three_branches() {
        let predicate = Predicate::or([
            Predicate::eq("c.id", 12),
            Predicate::contains("c.email", "12"),
            Predicate::is_null("s.mail_send_date"),
        ]);

        assert_eq!(
            predicate.to_string(),
            "(c.id = 12 OR c.email LIKE %12% OR s.mail_send_date IS NULL)"
        );
        assert_eq!(predicate.leaf_count(), 3);
    }

    #[test]
    fn single_child_group_is_unwrapped() {
        let predicate = Predicate::and([Predicate::not_in("o.order_status_id", [8, 7])]);
        assert_eq!(predicate.to_string(), "o.order_status_id NOT IN (8, 7)");
    }

    #[test]
    fn single_part_slice_is_a_plain_column() {
        let column: ColumnExpr = ["c.email"].as_slice().into();
        assert_eq!(column, ColumnExpr::column("c.email"));
    }
}
