//! # Predicate Composition
//!
//! This module turns a domain's declarative field table plus a sparse
//! [`SearchCriteria`](crate::criteria::SearchCriteria) into a [`SearchQuery`]:
//! a root table, joins, a conjunction of [`Predicate`]s and a [`SortSpec`].
//!
//! ## Fragment Quick Reference
//!
//! | Fragment        | Criterion example            | Predicate                                   |
//! |-----------------|------------------------------|---------------------------------------------|
//! | `IdEquals`      | `order_id = "42"`            | `o.id = 42` (guarded)                       |
//! | `MultiText`     | `multi = "yamada 12"`        | `(o.id = .. OR name LIKE .. OR ..)`         |
//! | `Contains`      | `name = "山田 太郎"`          | `concat(name01, name02) LIKE %山田太郎%`     |
//! | `Phone`         | `phone_number = "090-12"`    | `concat(phone01..03) LIKE %09012%`          |
//! | `ReferenceSet`  | `sex = [1, 2]`               | `o.sex_id IN (1, 2)`                        |
//! | `DateRange`     | `update_date_end = 2024-1-31`| `o.update_date < 2024-02-01`                |
//! | `MailFlag`      | `shipping_mail = ["1"]`      | `s.mail_send_date IS NULL`                  |
//! | `RelatedText`   | `buy_product_name = "tea"`   | join items, `oi.product_name LIKE %tea%`    |
//!
//! Status handling ([`StatusPolicy`]) and the sort whitelist ([`resolve_sort`])
//! are applied after the fragments. [`SqlRenderer`] is one possible consumer of
//! the finished query.

pub mod fragment;
pub mod predicate;
pub mod query;
pub mod sort;
pub mod sql;
pub mod status;

pub use fragment::{Col, ComposeContext, Fragment, MultiBranch};
pub use predicate::{ColumnExpr, Comparator, Predicate, Value};
pub use query::{Join, JoinDef, JoinKind, QueryExtension, SearchQuery};
pub use sort::{SortField, SortKey, SortOrder, SortSpec, resolve_sort};
pub use sql::{DatabaseEngine, Pagination, SqlRenderer, SqlStatement, escape_like_pattern};
pub use status::{StatusExclusion, StatusPolicy};
