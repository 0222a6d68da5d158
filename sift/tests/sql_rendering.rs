//! Rendering built queries to parameterized SQL per engine.

use sift::search::{DatabaseEngine, Pagination, SqlRenderer, Value};
use sift::{Customer, Order, SearchCriteria, SearchEngine, Shipping};

#[test]
fn customer_query_on_mysql() {
    let criteria = SearchCriteria::new().with("multi", "yamada").with("birth_month", 4);
    let query = SearchEngine::<Customer>::new(DatabaseEngine::MySql).build(&criteria);
    let statement = SqlRenderer::new(DatabaseEngine::MySql).select(&query, None);

    assert_eq!(
        statement.sql,
        r"SELECT c.* FROM dtb_customer c WHERE ((CONCAT(c.name01, c.name02) LIKE ? ESCAPE '\\' OR CONCAT(COALESCE(c.kana01, ''), COALESCE(c.kana02, '')) LIKE ? ESCAPE '\\' OR c.email LIKE ? ESCAPE '\\') AND MONTH(c.birth) = ?) ORDER BY c.update_date DESC, c.id DESC"
    );
    assert_eq!(
        statement.binds,
        [
            Value::Text("%yamada%".to_string()),
            Value::Text("%yamada%".to_string()),
            Value::Text("%yamada%".to_string()),
            Value::Int(4),
        ]
    );
}

#[test]
fn unconstrained_customer_query_has_no_where_clause() {
    let query =
        SearchEngine::<Customer>::new(DatabaseEngine::Postgres).build(&SearchCriteria::new());
    let renderer = SqlRenderer::new(DatabaseEngine::Postgres);

    assert_eq!(
        renderer.select(&query, Some(Pagination::new(1, 20, 100))).sql,
        "SELECT c.* FROM dtb_customer c ORDER BY c.update_date DESC, c.id DESC LIMIT 20 OFFSET 0"
    );
    assert_eq!(renderer.count(&query).sql, "SELECT COUNT(*) FROM dtb_customer c");
}

#[test]
fn joined_sort_keeps_one_row_per_order() {
    let criteria = SearchCriteria::new().with("sortkey", "shipping_date").with("sorttype", "a");
    let query = SearchEngine::<Order>::new(DatabaseEngine::Sqlite).build(&criteria);
    let renderer = SqlRenderer::new(DatabaseEngine::Sqlite);
    let select = renderer.select(&query, None);
    let count = renderer.count(&query);

    let filtered = "FROM dtb_order o INNER JOIN dtb_shipping s ON s.order_id = o.id \
                    WHERE o.order_status_id NOT IN (?, ?)";
    assert_eq!(
        select.sql,
        format!(
            "SELECT o.* {filtered} GROUP BY o.id \
             ORDER BY MIN(s.shipping_date) ASC, o.update_date DESC, o.id DESC"
        )
    );
    assert_eq!(count.sql, format!("SELECT COUNT(DISTINCT o.id) {filtered}"));
    assert_eq!(select.binds, count.binds);
    assert!(!select.sql.contains("DISTINCT"));
}

#[test]
fn shipment_count_is_distinct() {
    let criteria = SearchCriteria::new().with("phone_number", "090-1111-2222");
    let query = SearchEngine::<Shipping>::new(DatabaseEngine::Sqlite).build(&criteria);
    let statement = SqlRenderer::new(DatabaseEngine::Sqlite).count(&query);

    assert_eq!(
        statement.sql,
        r"SELECT COUNT(DISTINCT s.id) FROM dtb_shipping s LEFT JOIN dtb_order_item si ON si.shipping_id = s.id LEFT JOIN dtb_order o ON o.id = si.order_id WHERE ((s.phone_number01 || s.phone_number02 || s.phone_number03) LIKE ? ESCAPE '\' AND o.order_status_id NOT IN (?, ?))"
    );
    assert_eq!(
        statement.binds,
        [Value::Text("%09011112222%".to_string()), Value::Int(8), Value::Int(7)]
    );
}

#[test]
fn page_size_is_clamped() {
    let page = Pagination::new(0, 10_000, 500);
    assert_eq!(page, Pagination { page: 1, page_size: 500 });
    assert_eq!(Pagination::new(3, 25, 500).offset(), 50);
}
