use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `a` / `asc` (any case) selects ascending; anything else descends.
    pub fn from_sort_type(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("a") || value.eq_ignore_ascii_case("asc") => {
                SortOrder::Asc
            }
            _ => SortOrder::Desc,
        }
    }
}

/// A whitelisted, user-selectable sort key and the column it maps to.
#[derive(Debug, Clone, Copy)]
pub struct SortField {
    pub name: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub column: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }
}

/// Requested sort plus the fixed tie-break suffix.
///
/// The tie-breaks (last modified, then id, both descending) always follow the
/// primary key, so the ordering is total and pagination is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub primary: Option<SortKey>,
    tie_breaks: [SortKey; 2],
}

impl SortSpec {
    pub fn new(primary: Option<SortKey>, last_modified_column: &str, id_column: &str) -> Self {
        Self {
            primary,
            tie_breaks: [
                SortKey::new(last_modified_column, SortOrder::Desc),
                SortKey::new(id_column, SortOrder::Desc),
            ],
        }
    }

    pub fn tie_breaks(&self) -> &[SortKey; 2] {
        &self.tie_breaks
    }

    /// Full `ORDER BY` list: primary key (if any) followed by the tie-breaks.
    pub fn keys(&self) -> impl Iterator<Item = &SortKey> {
        self.primary.iter().chain(self.tie_breaks.iter())
    }
}

/// Maps a requested `(sortkey, sorttype)` onto the whitelist.
///
/// Unknown keys are treated as absent; the tie-breaks apply either way.
pub fn resolve_sort(
    allowed: &[SortField],
    sort_key: Option<&str>,
    sort_type: Option<&str>,
    last_modified_column: &str,
    id_column: &str,
) -> SortSpec {
    let primary = sort_key.map(str::trim).filter(|key| !key.is_empty()).and_then(|key| {
        let field = allowed.iter().find(|field| field.name.eq_ignore_ascii_case(key));
        if field.is_none() {
            log::debug!("ignoring unsupported sort key {key:?}");
        }
        field.map(|field| SortKey::new(field.column, SortOrder::from_sort_type(sort_type)))
    });
    SortSpec::new(primary, last_modified_column, id_column)
}
