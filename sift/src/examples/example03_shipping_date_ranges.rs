use anyhow::Result;

use crate::search::DatabaseEngine;
use crate::{SearchCriteria, SearchEngine, Shipping};

/// Example 03 – date-only end bounds include the whole last day.
pub fn run() -> Result<()> {
    let engine = SearchEngine::<Shipping>::new(DatabaseEngine::MySql);
    let criteria = SearchCriteria::new()
        .with("shipping_date_start", "2024-03-01")
        .with("shipping_date_end", "2024-03-31")
        .with("order_status", vec![5]);

    let rendered: Vec<String> = engine
        .build(&criteria)
        .conditions()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        rendered,
        [
            "s.shipping_date >= 2024-03-01",
            "s.shipping_date < 2024-04-01",
            "o.order_status_id IN (5)",
        ]
    );
    Ok(())
}
