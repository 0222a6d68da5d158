//! Integration tests that run all library examples.
//!
//! Each example asserts on the queries it builds.

#[test]
fn example01_customer_multi_search() {
    sift::examples::example01_customer_multi_search::run().expect("example should succeed");
}

#[test]
fn example02_order_status_defaults() {
    sift::examples::example02_order_status_defaults::run().expect("example should succeed");
}

#[test]
fn example03_shipping_date_ranges() {
    sift::examples::example03_shipping_date_ranges::run().expect("example should succeed");
}

#[test]
fn example04_customization_hooks() {
    sift::examples::example04_customization_hooks::run().expect("example should succeed");
}

#[test]
fn example05_sql_rendering() {
    sift::examples::example05_sql_rendering::run().expect("example should succeed");
}
