//! Customer search.

use crate::criteria::CriterionValue;
use crate::domains::{DomainKey, DomainSchema, OrderStatus, SearchDomain};
use crate::filters::DateRangeKeys;
use crate::search::{
    Col, Fragment, JoinDef, JoinKind, MultiBranch, SortField, StatusExclusion, StatusPolicy,
};

/// Membership state of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum CustomerStatus {
    Provisional = 1,
    Regular = 2,
    Withdrawing = 3,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Provisional,
        CustomerStatus::Regular,
        CustomerStatus::Withdrawing,
    ];

    #[inline]
    pub const fn id(self) -> i64 {
        self as i64
    }

    pub const fn name(self) -> &'static str {
        match self {
            CustomerStatus::Provisional => "provisional",
            CustomerStatus::Regular => "regular",
            CustomerStatus::Withdrawing => "withdrawing",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.id() == id)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|status| status.name().eq_ignore_ascii_case(name))
    }

    /// Accepts an id (integer or digit text) or a name.
    pub fn resolve(value: &CriterionValue) -> Option<i64> {
        let status = match value {
            CriterionValue::Text(text) => match text.trim().parse::<i64>() {
                Ok(id) => Self::from_id(id),
                Err(_) => Self::from_name(text),
            },
            other => other.as_integer().and_then(Self::from_id),
        };
        status.map(Self::id)
    }
}

const NAME: &[&str] = &["c.name01", "c.name02"];
const KANA: &[&str] = &["c.kana01", "c.kana02"];
const PHONE: &[&str] = &["c.phone_number01", "c.phone_number02", "c.phone_number03"];

const PURCHASED_ITEMS: &[JoinDef] = &[
    JoinDef {
        kind: JoinKind::Left,
        table: "dtb_order",
        alias: "o",
        on: "o.customer_id = c.id",
        fans_out: true,
    },
    JoinDef {
        kind: JoinKind::Left,
        table: "dtb_order_item",
        alias: "oi",
        on: "oi.order_id = o.id",
        fans_out: true,
    },
];

const FIELDS: &[Fragment] = &[
    Fragment::MultiText {
        key: "multi",
        id_column: Some("c.id"),
        branches: &[
            MultiBranch::Cleaned(Col::Concat(NAME)),
            MultiBranch::Cleaned(Col::ConcatCoalesced(KANA)),
            MultiBranch::Cleaned(Col::Field("c.email")),
        ],
    },
    Fragment::Reference {
        key: "pref",
        column: Col::Field("c.pref_id"),
    },
    Fragment::ReferenceSet {
        key: "sex",
        column: "c.sex_id",
    },
    Fragment::Reference {
        key: "birth_month",
        column: Col::Month("c.birth"),
    },
    Fragment::DateRange {
        keys: DateRangeKeys::dates_only("birth_start", "birth_end"),
        column: "c.birth",
    },
    Fragment::Phone {
        key: "phone_number",
        columns: PHONE,
    },
    Fragment::NumberRange {
        start: "buy_total_start",
        end: "buy_total_end",
        column: "c.buy_total",
    },
    Fragment::NumberRange {
        start: "buy_times_start",
        end: "buy_times_end",
        column: "c.buy_times",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "create_datetime_start",
            "create_date_start",
            "create_datetime_end",
            "create_date_end",
        ),
        column: "c.create_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "update_datetime_start",
            "update_date_start",
            "update_datetime_end",
            "update_date_end",
        ),
        column: "c.update_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "last_buy_datetime_start",
            "last_buy_start",
            "last_buy_datetime_end",
            "last_buy_end",
        ),
        column: "c.last_buy_date",
    },
    // Only orders that completed checkout count as purchases.
    Fragment::RelatedText {
        key: "buy_product_name",
        joins: PURCHASED_ITEMS,
        column: "oi.product_name",
        scoped_exclusion: Some(StatusExclusion {
            column: "o.order_status_id",
            transient: OrderStatus::TRANSIENT,
        }),
    },
];

static SCHEMA: DomainSchema = DomainSchema {
    key: DomainKey::CustomerSearch,
    table: "dtb_customer",
    alias: "c",
    id_column: "c.id",
    last_modified_column: "c.update_date",
    joins: &[],
    fields: FIELDS,
    status: Some(StatusPolicy {
        key: "customer_status",
        exclusion: StatusExclusion {
            column: "c.customer_status_id",
            transient: &[],
        },
        resolve: CustomerStatus::resolve,
    }),
    kana_fields: &[],
    sorts: &[
        SortField {
            name: "customer_id",
            column: "c.id",
        },
        SortField {
            name: "name",
            column: "c.name01",
        },
    ],
};

/// Marker for the customer search pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Customer;

impl SearchDomain for Customer {
    const KEY: DomainKey = DomainKey::CustomerSearch;

    fn schema() -> &'static DomainSchema {
        &SCHEMA
    }
}
