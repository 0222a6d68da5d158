//! Sparse search criteria supplied by a back-office search form.
//!
//! A [`SearchCriteria`] maps field names to loosely-typed [`CriterionValue`]s.
//! Accessors answer the only question the composer cares about: "does this
//! field constrain the search, and with what value?". Anything absent, null,
//! blank or unparseable answers `None`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::SearchError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single criterion value as it arrives from a form or JSON document.
///
/// Nested objects land in `Other`; no field reads them, so they count as
/// blank and never fail the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<CriterionValue>),
    Other(serde_json::Value),
}

impl CriterionValue {
    /// Returns the scalar as text, or `None` for null, booleans, lists and objects.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Self::Integer(value) => Some(Cow::Owned(value.to_string())),
            Self::Float(value) if value.is_finite() => Some(Cow::Owned(value.to_string())),
            Self::Float(_) | Self::Null | Self::Bool(_) | Self::List(_) | Self::Other(_) => None,
        }
    }

    /// Whole-number value of an integer, or of a float with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(value) => Some(value),
            Self::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                Some(value as i64)
            }
            _ => None,
        }
    }

    /// Blank means "no constraint": null, empty lists and whitespace-only text.
    ///
    /// Whitespace includes the full-width space (U+3000).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null | Self::Other(_) => true,
            Self::Bool(_) | Self::Integer(_) => false,
            Self::Float(value) => !value.is_finite(),
            Self::Text(value) => value.chars().all(char::is_whitespace),
            Self::List(items) => items.iter().all(Self::is_blank),
        }
    }

    /// Iterates the members of a list, or the value itself when it is a scalar.
    pub fn members(&self) -> impl Iterator<Item = &CriterionValue> {
        let items: &[CriterionValue] = match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        };
        items.iter().filter(|item| !item.is_blank())
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CriterionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CriterionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for CriterionValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for CriterionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CriterionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<CriterionValue>> From<Vec<T>> for CriterionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Sparse set of optional search constraints keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria {
    values: BTreeMap<String, CriterionValue>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of criteria, e.g. `{"multi": "yamada", "status": [1, 5]}`.
    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insert.
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CriterionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CriterionValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CriterionValue> {
        self.values.get(key).filter(|value| !value.is_blank())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriterionValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Non-blank scalar text for `key`, untrimmed.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(CriterionValue::as_text)
    }

    /// Non-blank members of a list criterion (a scalar counts as a one-element list).
    pub fn list(&self, key: &str) -> Vec<&CriterionValue> {
        self.get(key).map(|value| value.members().collect()).unwrap_or_default()
    }

    /// Calendar date for `key`. A timestamp value is truncated to its date.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.text(key)?;
        let raw = raw.trim();
        let parsed = DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .or_else(|| parse_datetime(raw).map(|datetime| datetime.date()));
        if parsed.is_none() {
            log::debug!("ignoring criterion {key}: {raw:?} is not a date");
        }
        parsed
    }

    /// Precise timestamp for `key`.
    pub fn datetime(&self, key: &str) -> Option<NaiveDateTime> {
        let raw = self.text(key)?;
        let parsed = parse_datetime(raw.trim());
        if parsed.is_none() {
            log::debug!("ignoring criterion {key}: {raw:?} is not a timestamp");
        }
        parsed
    }
}

impl<K, V> FromIterator<(K, V)> for SearchCriteria
where
    K: Into<String>,
    V: Into<CriterionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (key, value) in iter {
            criteria.insert(key, value);
        }
        criteria
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
