use anyhow::Result;

use crate::search::{DatabaseEngine, SqlRenderer, Value};
use crate::{Order, SearchCriteria, SearchEngine, SiftConfig};

/// Example 05 – rendering a query to parameterized SQL.
pub fn run() -> Result<()> {
    let config = SiftConfig::default();
    let engine = SearchEngine::<Order>::from_config(&config);
    let query = engine.build(
        &SearchCriteria::new()
            .with("buy_product_name", "100%")
            .with("order_id_start", "10"),
    );

    let renderer = SqlRenderer::new(DatabaseEngine::Postgres);
    let statement = renderer.select(&query, Some(config.pagination(Some(2), None)));

    assert_eq!(
        statement.sql,
        "SELECT o.* FROM dtb_order o \
         INNER JOIN dtb_shipping s ON s.order_id = o.id \
         LEFT JOIN dtb_order_item oi ON oi.order_id = o.id \
         WHERE (o.id >= $1 AND oi.product_name LIKE $2 ESCAPE '\\' AND o.order_status_id NOT IN ($3, $4)) \
         GROUP BY o.id ORDER BY o.update_date DESC, o.id DESC LIMIT 50 OFFSET 50"
    );
    assert_eq!(
        statement.binds,
        [
            Value::Int(10),
            Value::Text("%100\\%%".to_string()),
            Value::Int(8),
            Value::Int(7),
        ]
    );

    let count = renderer.count(&query);
    assert!(count.sql.starts_with("SELECT COUNT(DISTINCT o.id)"));
    assert_eq!(count.binds, statement.binds);
    Ok(())
}
