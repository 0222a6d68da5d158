use std::sync::Arc;

use anyhow::Result;

use crate::search::{DatabaseEngine, Predicate};
use crate::{CustomizerRegistry, DomainKey, Order, SearchCriteria, SearchEngine};

/// Example 04 – extending a pipeline without touching the domain table.
pub fn run() -> Result<()> {
    let mut registry = CustomizerRegistry::new();
    registry.register(DomainKey::OrderSearchAdmin, |query, criteria| {
        if let Some(shop) = criteria.text("shop_code") {
            query.and_where(Predicate::eq("o.shop_code", shop.into_owned()));
        }
    });

    let engine = SearchEngine::<Order>::new(DatabaseEngine::Postgres)
        .with_customizers(Arc::new(registry));
    let query = engine.build(&SearchCriteria::new().with("shop_code", "osaka"));

    // Hook output comes after everything the domain contributed.
    assert_eq!(
        query.conditions(),
        [
            Predicate::not_in("o.order_status_id", [8, 7]),
            Predicate::eq("o.shop_code", "osaka"),
        ]
    );
    Ok(())
}
