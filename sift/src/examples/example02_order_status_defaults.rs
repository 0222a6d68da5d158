use anyhow::Result;

use crate::search::{DatabaseEngine, Predicate};
use crate::{Order, SearchCriteria, SearchEngine};

/// Example 02 – in-flight checkouts stay hidden unless a status is chosen.
pub fn run() -> Result<()> {
    let engine = SearchEngine::<Order>::new(DatabaseEngine::Postgres);

    let hidden = engine.build(&SearchCriteria::new().with("email", "example.com"));
    assert!(
        hidden
            .conditions()
            .contains(&Predicate::not_in("o.order_status_id", [8, 7]))
    );

    let chosen =
        engine.build(&SearchCriteria::new().with("status", vec!["processing", "delivered"]));
    assert!(
        chosen
            .conditions()
            .contains(&Predicate::in_list("o.order_status_id", [8, 5]))
    );
    assert!(
        !chosen
            .conditions()
            .iter()
            .any(|condition| matches!(condition, Predicate::NotIn { .. }))
    );

    let sorted = engine.build(
        &SearchCriteria::new()
            .with("sortkey", "purchase_price")
            .with("sorttype", "a"),
    );
    let columns: Vec<String> = sorted
        .sort()
        .keys()
        .map(|key| format!("{} {}", key.column, key.order.as_str()))
        .collect();
    assert_eq!(columns, ["o.payment_total ASC", "o.update_date DESC", "o.id DESC"]);
    Ok(())
}
