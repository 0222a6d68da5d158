//! Customer search pipeline, end to end.

use sift::search::{DatabaseEngine, Predicate};
use sift::{Customer, SearchCriteria, SearchEngine};

fn conditions(criteria: &SearchCriteria) -> Vec<String> {
    SearchEngine::<Customer>::new(DatabaseEngine::Postgres)
        .build(criteria)
        .conditions()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn empty_criteria_builds_an_unconstrained_query() {
    let query =
        SearchEngine::<Customer>::new(DatabaseEngine::Postgres).build(&SearchCriteria::new());
    assert!(query.conditions().is_empty());
    assert!(query.joins().is_empty());
    assert_eq!(query.predicate(), Predicate::and([]));
}

#[test]
fn unknown_keys_are_ignored() {
    let criteria = SearchCriteria::new().with("favourite_colour", "blue").with("page_no", 3);
    assert!(conditions(&criteria).is_empty());
}

#[test]
fn multi_with_text_skips_the_identifier_branch() {
    let criteria = SearchCriteria::new().with("multi", "yamada");
    assert_eq!(
        conditions(&criteria),
        ["(concat(c.name01, c.name02) LIKE %yamada% \
          OR concat_coalesce(c.kana01, c.kana02) LIKE %yamada% \
          OR c.email LIKE %yamada%)"]
    );
}

#[test]
fn reference_criteria_require_truthy_values() {
    assert!(conditions(&SearchCriteria::new().with("pref", 0)).is_empty());
    assert!(conditions(&SearchCriteria::new().with("pref", "0")).is_empty());
    assert_eq!(conditions(&SearchCriteria::new().with("pref", "27")), ["c.pref_id = 27"]);
    assert_eq!(
        conditions(&SearchCriteria::new().with("birth_month", 4)),
        ["month(c.birth) = 4"]
    );
}

#[test]
fn empty_reference_set_adds_nothing() {
    let criteria = SearchCriteria::new().with("sex", Vec::<i64>::new());
    assert!(conditions(&criteria).is_empty());
}

#[test]
fn number_ranges_are_inclusive_and_skip_garbage() {
    let criteria = SearchCriteria::new()
        .with("buy_total_start", "1000")
        .with("buy_total_end", "lots")
        .with("buy_times_end", "2.5");
    assert_eq!(
        conditions(&criteria),
        ["c.buy_total >= 1000", "c.buy_times <= 2.5"]
    );
}

#[test]
fn last_purchase_range_accepts_precise_start() {
    let criteria = SearchCriteria::new()
        .with("last_buy_datetime_start", "2024-05-01T09:30:00")
        .with("last_buy_start", "2024-04-01")
        .with("last_buy_end", "2024-05-31");
    assert_eq!(
        conditions(&criteria),
        [
            "c.last_buy_date >= 2024-05-01T09:30:00",
            "c.last_buy_date < 2024-06-01",
        ]
    );
}

#[test]
fn purchased_product_joins_orders_and_hides_transient_ones() {
    let criteria = SearchCriteria::new().with("buy_product_name", "Tシャツ");
    let query = SearchEngine::<Customer>::new(DatabaseEngine::Postgres).build(&criteria);

    assert!(query.has_join("o"));
    assert!(query.has_join("oi"));
    assert!(query.fans_out());
    assert_eq!(
        query.conditions(),
        [
            Predicate::contains("oi.product_name", "Tシャツ"),
            Predicate::not_in("o.order_status_id", [8, 7]),
        ]
    );
}

#[test]
fn customer_status_selection_is_applied_verbatim() {
    let criteria = SearchCriteria::new().with("customer_status", vec!["regular", "1"]);
    assert_eq!(conditions(&criteria), ["c.customer_status_id IN (2, 1)"]);
}

#[test]
fn sort_falls_back_to_tie_breaks() {
    let query = SearchEngine::<Customer>::new(DatabaseEngine::Postgres)
        .build(&SearchCriteria::new().with("sortkey", "name").with("sorttype", "a"));
    let columns: Vec<String> = query
        .sort()
        .keys()
        .map(|key| format!("{} {}", key.column, key.order.as_str()))
        .collect();
    assert_eq!(columns, ["c.name01 ASC", "c.update_date DESC", "c.id DESC"]);
}
