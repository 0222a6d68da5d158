use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::criteria::SearchCriteria;
use crate::domains::DomainKey;
use crate::search::QueryExtension;

/// Extension point run after a domain's own predicates and sort are attached.
///
/// Contributors can only add to the query; see [`QueryExtension`]. Closures
/// with the matching signature implement this trait.
pub trait QueryCustomizer: Send + Sync {
    fn customize(&self, query: &mut QueryExtension<'_>, criteria: &SearchCriteria);
}

impl<F> QueryCustomizer for F
where
    F: Fn(&mut QueryExtension<'_>, &SearchCriteria) + Send + Sync,
{
    fn customize(&self, query: &mut QueryExtension<'_>, criteria: &SearchCriteria) {
        self(query, criteria)
    }
}

/// Contributors keyed by domain, run in registration order.
#[derive(Default, Clone)]
pub struct CustomizerRegistry {
    customizers: HashMap<DomainKey, Vec<Arc<dyn QueryCustomizer>>>,
}

impl CustomizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure contributor for `key`.
    pub fn register<F>(&mut self, key: DomainKey, customizer: F) -> &mut Self
    where
        F: Fn(&mut QueryExtension<'_>, &SearchCriteria) + Send + Sync + 'static,
    {
        self.register_customizer(key, Arc::new(customizer))
    }

    pub fn register_customizer(
        &mut self,
        key: DomainKey,
        customizer: Arc<dyn QueryCustomizer>,
    ) -> &mut Self {
        self.customizers.entry(key).or_default().push(customizer);
        self
    }

    pub fn customizers(&self, key: DomainKey) -> &[Arc<dyn QueryCustomizer>] {
        self.customizers.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self, key: DomainKey) -> usize {
        self.customizers(key).len()
    }

    /// Runs every contributor registered for `key` against `query`.
    pub fn apply(&self, key: DomainKey, query: &mut QueryExtension<'_>, criteria: &SearchCriteria) {
        for customizer in self.customizers(key) {
            customizer.customize(query, criteria);
        }
    }
}

impl fmt::Debug for CustomizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, customizers) in &self.customizers {
            map.entry(&key.as_str(), &customizers.len());
        }
        map.finish()
    }
}
