//! The search pipeline.
//!
//! `criteria -> kana normalization -> fragments -> status policy -> sort -> customizers`

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::SiftConfig;
use crate::criteria::SearchCriteria;
use crate::domains::{DomainSchema, SORT_KEY, SORT_TYPE, SearchDomain};
use crate::filters::{KanaNormalizer, KatakanaNormalizer, normalize_kana_fields};
use crate::registry::CustomizerRegistry;
use crate::search::{ComposeContext, DatabaseEngine, QueryExtension, SearchQuery, resolve_sort};

/// Builds [`SearchQuery`] descriptors for one domain.
///
/// An engine holds no per-request state and can be shared across threads.
pub struct SearchEngine<D> {
    engine: DatabaseEngine,
    kana: Arc<dyn KanaNormalizer>,
    customizers: Arc<CustomizerRegistry>,
    _domain: PhantomData<fn() -> D>,
}

impl<D> Clone for SearchEngine<D> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine,
            kana: Arc::clone(&self.kana),
            customizers: Arc::clone(&self.customizers),
            _domain: PhantomData,
        }
    }
}

impl<D> fmt::Debug for SearchEngine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("engine", &self.engine)
            .field("kana", &self.kana)
            .field("customizers", &self.customizers)
            .finish()
    }
}

impl<D: SearchDomain> SearchEngine<D> {
    pub fn new(engine: DatabaseEngine) -> Self {
        Self {
            engine,
            kana: Arc::new(KatakanaNormalizer),
            customizers: Arc::new(CustomizerRegistry::new()),
            _domain: PhantomData,
        }
    }

    pub fn from_config(config: &SiftConfig) -> Self {
        Self::new(config.database.engine).with_kana_normalizer(config.kana_normalizer())
    }

    pub fn with_kana_normalizer(mut self, normalizer: Arc<dyn KanaNormalizer>) -> Self {
        self.kana = normalizer;
        self
    }

    pub fn with_customizers(mut self, registry: Arc<CustomizerRegistry>) -> Self {
        self.customizers = registry;
        self
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    pub fn schema(&self) -> &'static DomainSchema {
        D::schema()
    }

    /// Criteria as the composer sees them, with kana fields rewritten.
    pub fn normalize(&self, criteria: &SearchCriteria) -> SearchCriteria {
        let mut normalized = criteria.clone();
        normalize_kana_fields(&mut normalized, D::schema().kana_fields, self.kana.as_ref());
        normalized
    }

    /// Composes the query for `criteria`. Never fails; criteria that cannot be
    /// honoured contribute nothing.
    pub fn build(&self, criteria: &SearchCriteria) -> SearchQuery {
        let schema = D::schema();
        let normalized = self.normalize(criteria);

        let sort = resolve_sort(
            schema.sorts,
            normalized.text(SORT_KEY).as_deref(),
            normalized.text(SORT_TYPE).as_deref(),
            schema.last_modified_column,
            schema.id_column,
        );
        let mut query = SearchQuery::new(D::KEY, schema.table, schema.alias, sort);
        for join in schema.joins {
            query.join(join.to_join());
        }

        let ctx = ComposeContext {
            criteria: &normalized,
            engine: self.engine,
        };
        for fragment in schema.fields {
            fragment.contribute(&ctx, &mut query);
        }
        if let Some(predicate) = schema
            .status
            .as_ref()
            .and_then(|status| status.predicate(&normalized))
        {
            query.and_where(predicate);
        }

        self.customizers.apply(D::KEY, &mut QueryExtension::new(&mut query), criteria);

        log::trace!("built {} query: {}", D::KEY, query.predicate());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{Customer, Order, Shipping};
    use crate::filters::IdentityKana;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engines_are_shareable() {
        assert_send_sync::<SearchEngine<Customer>>();
        assert_send_sync::<SearchEngine<Order>>();
        assert_send_sync::<SearchEngine<Shipping>>();
    }

    #[test]
    fn normalize_rewrites_only_kana_fields() {
        let engine = SearchEngine::<Order>::new(DatabaseEngine::Postgres);
        let criteria = SearchCriteria::new().with("kana", "やまだ ﾀﾛｳ").with("name", "やまだ");
        let normalized = engine.normalize(&criteria);

        assert_eq!(normalized.text("kana").as_deref(), Some("ヤマダ タロウ"));
        assert_eq!(normalized.text("name").as_deref(), Some("やまだ"));
        assert_eq!(criteria.text("kana").as_deref(), Some("やまだ ﾀﾛｳ"));
    }

    #[test]
    fn identity_normalizer_keeps_input() {
        let engine = SearchEngine::<Order>::new(DatabaseEngine::Postgres)
            .with_kana_normalizer(Arc::new(IdentityKana));
        let query = engine.build(&SearchCriteria::new().with("kana", "やまだ"));
        assert_eq!(query.normalized().get("kana").map(String::as_str), Some("やまだ"));
    }

    #[test]
    fn empty_criteria_only_applies_defaults() {
        let query =
            SearchEngine::<Order>::new(DatabaseEngine::Postgres).build(&SearchCriteria::new());
        assert_eq!(query.predicate().to_string(), "o.order_status_id NOT IN (8, 7)");
        assert!(query.has_join("s"));
        assert!(query.sort().primary.is_none());
    }
}
