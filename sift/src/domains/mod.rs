//! Searchable record types and their field tables.
//!
//! Each domain is a zero-sized marker implementing [`SearchDomain`]; the
//! behavior lives entirely in its static [`DomainSchema`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::SearchError;
use crate::search::{Fragment, JoinDef, SortField, StatusPolicy};

pub mod customer;
pub mod order;
pub mod shipping;

pub use customer::{Customer, CustomerStatus};
pub use order::{Order, OrderStatus};
pub use shipping::Shipping;

/// Criterion naming the requested sort key.
pub const SORT_KEY: &str = "sortkey";
/// Criterion naming the requested sort direction.
pub const SORT_TYPE: &str = "sorttype";

/// Identifies a search pipeline; customization hooks are registered against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainKey {
    CustomerSearch,
    OrderSearchAdmin,
    ShippingSearchAdmin,
}

impl DomainKey {
    pub const ALL: [DomainKey; 3] = [
        DomainKey::CustomerSearch,
        DomainKey::OrderSearchAdmin,
        DomainKey::ShippingSearchAdmin,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DomainKey::CustomerSearch => "customer.search",
            DomainKey::OrderSearchAdmin => "order.search.admin",
            DomainKey::ShippingSearchAdmin => "shipping.search.admin",
        }
    }

    /// Short name used on the command line.
    #[inline]
    pub const fn short_name(self) -> &'static str {
        match self {
            DomainKey::CustomerSearch => "customer",
            DomainKey::OrderSearchAdmin => "order",
            DomainKey::ShippingSearchAdmin => "shipping",
        }
    }

    pub fn schema(self) -> &'static DomainSchema {
        match self {
            DomainKey::CustomerSearch => Customer::schema(),
            DomainKey::OrderSearchAdmin => Order::schema(),
            DomainKey::ShippingSearchAdmin => Shipping::schema(),
        }
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DomainKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for DomainKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DomainKey::ALL
            .into_iter()
            .find(|key| {
                key.short_name().eq_ignore_ascii_case(wanted)
                    || key.as_str().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                SearchError::invalid_request(format!("unknown search domain '{wanted}'"))
            })
    }
}

/// Static description of one searchable record type.
#[derive(Debug)]
pub struct DomainSchema {
    pub key: DomainKey,
    pub table: &'static str,
    pub alias: &'static str,
    pub id_column: &'static str,
    pub last_modified_column: &'static str,
    /// Joins present on every query of this domain.
    pub joins: &'static [JoinDef],
    pub fields: &'static [Fragment],
    pub status: Option<StatusPolicy>,
    /// Criteria rewritten by the kana normalizer before composition.
    pub kana_fields: &'static [&'static str],
    pub sorts: &'static [SortField],
}

impl DomainSchema {
    /// Every criterion key this domain reads, in table order.
    pub fn recognized_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.fields.iter().flat_map(Fragment::keys).collect();
        if let Some(status) = &self.status {
            keys.push(status.key);
        }
        if !self.sorts.is_empty() {
            keys.extend([SORT_KEY, SORT_TYPE]);
        }
        keys
    }
}

/// A record type with a search pipeline.
pub trait SearchDomain {
    const KEY: DomainKey;

    fn schema() -> &'static DomainSchema;
}
