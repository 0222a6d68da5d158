//! Shipment search pipeline, end to end.

use sift::search::{DatabaseEngine, JoinKind, Predicate, SortKey, SortOrder, SqlRenderer};
use sift::{SearchCriteria, SearchEngine, Shipping};

fn engine() -> SearchEngine<Shipping> {
    SearchEngine::new(DatabaseEngine::Postgres)
}

const DEFAULT_EXCLUSION: &str = "o.order_status_id NOT IN (8, 7)";

fn conditions(criteria: &SearchCriteria) -> Vec<String> {
    engine().build(criteria).conditions().iter().map(ToString::to_string).collect()
}

#[test]
fn shipments_reach_orders_through_items() {
    let query = engine().build(&SearchCriteria::new());
    let aliases: Vec<&str> = query.joins().iter().map(|join| join.alias.as_str()).collect();
    assert_eq!(aliases, ["si", "o"]);
    assert_eq!(query.conditions(), [Predicate::not_in("o.order_status_id", [8, 7])]);
}

#[test]
fn sort_is_fixed() {
    let query = engine().build(
        &SearchCriteria::new()
            .with("sortkey", "shipping_date")
            .with("sorttype", "a"),
    );
    assert!(query.sort().primary.is_none());
    let keys: Vec<&SortKey> = query.sort().keys().collect();
    assert_eq!(
        keys,
        [
            &SortKey::new("s.update_date", SortOrder::Desc),
            &SortKey::new("s.id", SortOrder::Desc),
        ]
    );
}

#[test]
fn multi_keeps_raw_company_branch() {
    let criteria = SearchCriteria::new().with("multi", "ACME\u{3000}Corp");
    assert_eq!(
        conditions(&criteria),
        [
            "(concat(s.name01, s.name02) LIKE %ACMECorp% \
             OR concat_coalesce(s.kana01, s.kana02) LIKE %ACMECorp% \
             OR s.company_name LIKE %ACME\u{3000}Corp%)",
            DEFAULT_EXCLUSION,
        ]
    );
}

#[test]
fn both_kana_fields_are_normalized() {
    let criteria = SearchCriteria::new().with("kana", "ｽｽﾞｷ").with("order_kana", "すずき");
    assert_eq!(
        conditions(&criteria),
        [
            "concat_coalesce(s.kana01, s.kana02) LIKE %スズキ%",
            "concat_coalesce(o.kana01, o.kana02) LIKE %スズキ%",
            DEFAULT_EXCLUSION,
        ]
    );
}

#[test]
fn date_ranges_are_date_only() {
    let criteria = SearchCriteria::new()
        .with("update_date_start", "2024-02-01")
        .with("update_date_end", "2024-02-29");
    assert_eq!(
        conditions(&criteria),
        ["s.update_date >= 2024-02-01", "s.update_date < 2024-03-01", DEFAULT_EXCLUSION]
    );
}

#[test]
fn explicit_order_status_lifts_the_exclusion() {
    let criteria = SearchCriteria::new().with("order_status", vec!["pending"]);
    assert_eq!(conditions(&criteria), ["o.order_status_id IN (7)"]);
}

#[test]
fn orderless_shipments_fall_to_the_default_exclusion() {
    // The exclusion is a bare NOT IN on the LEFT-joined order; a NULL status
    // never satisfies it, so shipments without an order are filtered out.
    let query = engine().build(&SearchCriteria::new());
    let order_join = query.joins().iter().find(|join| join.alias == "o");
    assert_eq!(order_join.map(|join| join.kind), Some(JoinKind::Left));
    assert_eq!(query.conditions(), [Predicate::not_in("o.order_status_id", [8, 7])]);

    let statement = SqlRenderer::new(DatabaseEngine::Postgres).count(&query);
    assert!(statement.sql.ends_with("WHERE o.order_status_id NOT IN ($1, $2)"));
    assert!(!statement.sql.contains("IS NULL"));
}
