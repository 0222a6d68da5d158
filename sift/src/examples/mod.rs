//! Runnable walkthroughs of the search pipelines, exercised by `tests/examples.rs`.

pub mod example01_customer_multi_search;
pub mod example02_order_status_defaults;
pub mod example03_shipping_date_ranges;
pub mod example04_customization_hooks;
pub mod example05_sql_rendering;
