//! Sift core library.
//!
//! Turns sparse back-office search criteria into predicate trees, one pipeline
//! per searchable record type (customers, orders, shipments). The result is a
//! [`SearchQuery`] descriptor; [`search::SqlRenderer`] turns it into
//! parameterized SQL.
//!
//! ```
//! use sift::{Order, SearchCriteria, SearchEngine};
//! use sift::search::DatabaseEngine;
//!
//! let engine = SearchEngine::<Order>::new(DatabaseEngine::Postgres);
//! let query = engine.build(&SearchCriteria::new().with("multi", "山田 太郎"));
//!
//! assert_eq!(query.normalized().get("multi").map(String::as_str), Some("山田太郎"));
//! assert_eq!(query.conditions().len(), 2);
//! ```

pub mod config;
pub mod criteria;
pub mod domains;
pub mod engine;
pub mod errors;
pub mod examples;
pub mod filters;
pub mod registry;
pub mod search;

pub use config::SiftConfig;
pub use criteria::{CriterionValue, SearchCriteria};
pub use domains::{Customer, DomainKey, Order, SearchDomain, Shipping};
pub use engine::SearchEngine;
pub use errors::*;
pub use registry::{CustomizerRegistry, QueryCustomizer};
pub use search::{Predicate, SearchQuery, SortOrder};
