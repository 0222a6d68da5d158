use std::collections::BTreeMap;

use serde::Serialize;

use crate::domains::DomainKey;
use crate::search::{Predicate, SortSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

/// A join declared by a domain schema.
#[derive(Debug, Clone, Copy)]
pub struct JoinDef {
    pub kind: JoinKind,
    pub table: &'static str,
    pub alias: &'static str,
    pub on: &'static str,
    /// The joined side is a collection, so root rows may repeat.
    pub fans_out: bool,
}

impl JoinDef {
    pub fn to_join(&self) -> Join {
        Join {
            kind: self.kind,
            table: self.table.to_string(),
            alias: self.alias.to_string(),
            on: self.on.to_string(),
            fans_out: self.fans_out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    pub on: String,
    pub fans_out: bool,
}

/// Executable query descriptor produced by a search engine.
///
/// Holds the root table, joins, the root conjunction of predicates and the
/// sort. `normalized()` exposes the cleaned free-text values actually used for
/// matching; screens echoing search text back must show these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    domain: DomainKey,
    table: String,
    alias: String,
    joins: Vec<Join>,
    conditions: Vec<Predicate>,
    sort: SortSpec,
    normalized: BTreeMap<String, String>,
}

impl SearchQuery {
    pub fn new(
        domain: DomainKey,
        table: impl Into<String>,
        alias: impl Into<String>,
        sort: SortSpec,
    ) -> Self {
        Self {
            domain,
            table: table.into(),
            alias: alias.into(),
            joins: Vec::new(),
            conditions: Vec::new(),
            sort,
            normalized: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> DomainKey {
        self.domain
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Children of the root conjunction, in the order they were added.
    pub fn conditions(&self) -> &[Predicate] {
        &self.conditions
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn normalized(&self) -> &BTreeMap<String, String> {
        &self.normalized
    }

    /// Root conjunction of every condition.
    pub fn predicate(&self) -> Predicate {
        Predicate::and(self.conditions.iter().cloned())
    }

    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|join| join.alias == alias)
    }

    /// Whether any join may repeat root rows.
    pub fn fans_out(&self) -> bool {
        self.joins.iter().any(|join| join.fans_out)
    }

    pub(crate) fn and_where(&mut self, predicate: Predicate) {
        self.conditions.push(predicate);
    }

    /// Adds a join unless one with the same alias is already present.
    pub(crate) fn join(&mut self, join: Join) {
        if !self.has_join(&join.alias) {
            self.joins.push(join);
        }
    }

    pub(crate) fn record_normalized(&mut self, key: &str, value: impl Into<String>) {
        self.normalized.insert(key.to_string(), value.into());
    }
}

/// Additive view of a query handed to customization hooks.
///
/// Hooks may attach predicates and joins and read what is already there; they
/// cannot remove or rewrite anything added by earlier stages.
pub struct QueryExtension<'a> {
    query: &'a mut SearchQuery,
}

impl<'a> QueryExtension<'a> {
    pub(crate) fn new(query: &'a mut SearchQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &SearchQuery {
        self.query
    }

    pub fn and_where(&mut self, predicate: Predicate) -> &mut Self {
        self.query.and_where(predicate);
        self
    }

    pub fn join(&mut self, join: Join) -> &mut Self {
        self.query.join(join);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortSpec;

    const ORDER_ITEMS: JoinDef = JoinDef {
        kind: JoinKind::Left,
        table: "dtb_order_item",
        alias: "oi",
        on: "oi.order_id = o.id",
        fans_out: true,
    };

    fn query() -> SearchQuery {
        SearchQuery::new(
            DomainKey::OrderSearchAdmin,
            "dtb_order",
            "o",
            SortSpec::new(None, "o.update_date", "o.id"),
        )
    }

    #[test]
    fn joins_are_deduplicated_by_alias() {
        let mut query = query();
        query.join(ORDER_ITEMS.to_join());
        query.join(ORDER_ITEMS.to_join());

        assert_eq!(query.joins().len(), 1);
        assert!(query.has_join("oi"));
        assert!(query.fans_out());
    }

    #[test]
    fn extension_only_appends() {
        let mut query = query();
        query.and_where(Predicate::eq("o.id", 1));

        let mut extension = QueryExtension::new(&mut query);
        extension.and_where(Predicate::is_not_null("o.payment_date"));
        assert_eq!(extension.query().conditions().len(), 2);

        assert_eq!(query.conditions()[0], Predicate::eq("o.id", 1));
        assert_eq!(
            query.predicate().to_string(),
            "(o.id = 1 AND o.payment_date IS NOT NULL)"
        );
    }
}
