//! Order search for the admin back-office.

use crate::criteria::CriterionValue;
use crate::domains::{DomainKey, DomainSchema, SearchDomain};
use crate::filters::DateRangeKeys;
use crate::search::{
    Col, Fragment, JoinDef, JoinKind, MultiBranch, SortField, StatusExclusion, StatusPolicy,
};

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum OrderStatus {
    New = 1,
    Cancel = 3,
    InProgress = 4,
    Delivered = 5,
    Paid = 6,
    /// Payment in progress.
    Pending = 7,
    /// Checkout in progress.
    Processing = 8,
    Returned = 9,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::New,
        OrderStatus::Cancel,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Paid,
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Returned,
    ];

    /// States hidden from admin search unless asked for explicitly.
    pub const TRANSIENT: &'static [i64] = &[
        OrderStatus::Processing as i64,
        OrderStatus::Pending as i64,
    ];

    #[inline]
    pub const fn id(self) -> i64 {
        self as i64
    }

    pub const fn name(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Cancel => "cancel",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Paid => "paid",
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.id() == id)
    }

    /// Looks a status up by name; `completed` and `canceled` are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("completed") {
            return Some(OrderStatus::Delivered);
        }
        if name.eq_ignore_ascii_case("canceled") || name.eq_ignore_ascii_case("cancelled") {
            return Some(OrderStatus::Cancel);
        }
        Self::ALL.into_iter().find(|status| status.name().eq_ignore_ascii_case(name))
    }

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

/// Values of the shipping-mail flag criterion.
pub const SHIPPING_MAIL_UNSENT: &str = "1";
pub const SHIPPING_MAIL_SENT: &str = "2";

const NAME: &[&str] = &["o.name01", "o.name02"];
const KANA: &[&str] = &["o.kana01", "o.kana02"];
const PHONE: &[&str] = &["o.phone_number01", "o.phone_number02", "o.phone_number03"];

const SHIPPINGS: JoinDef = JoinDef {
    kind: JoinKind::Inner,
    table: "dtb_shipping",
    alias: "s",
    on: "s.order_id = o.id",
    fans_out: true,
};

const ORDER_ITEMS: &[JoinDef] = &[JoinDef {
    kind: JoinKind::Left,
    table: "dtb_order_item",
    alias: "oi",
    on: "oi.order_id = o.id",
    fans_out: true,
}];

const FIELDS: &[Fragment] = &[
    Fragment::IdEquals {
        key: "order_id",
        column: "o.id",
    },
    Fragment::TextEquals {
        key: "order_no",
        column: "o.order_no",
    },
    Fragment::IdRange {
        start: "order_id_start",
        end: "order_id_end",
        column: "o.id",
    },
    Fragment::MultiText {
        key: "multi",
        id_column: Some("o.id"),
        branches: &[
            MultiBranch::Cleaned(Col::Concat(NAME)),
            MultiBranch::Cleaned(Col::ConcatCoalesced(KANA)),
            // Company names keep their inner spacing.
            MultiBranch::Raw(Col::Field("o.company_name")),
            MultiBranch::Cleaned(Col::Field("o.order_no")),
            MultiBranch::Cleaned(Col::Field("o.email")),
            MultiBranch::Cleaned(Col::Concat(PHONE)),
        ],
    },
    Fragment::Contains {
        key: "company_name",
        column: Col::Field("o.company_name"),
        strip_whitespace: false,
    },
    Fragment::Contains {
        key: "name",
        column: Col::Concat(NAME),
        strip_whitespace: true,
    },
    Fragment::Contains {
        key: "kana",
        column: Col::ConcatCoalesced(KANA),
        strip_whitespace: true,
    },
    Fragment::Contains {
        key: "email",
        column: Col::Field("o.email"),
        strip_whitespace: false,
    },
    Fragment::Phone {
        key: "phone_number",
        columns: PHONE,
    },
    Fragment::ReferenceSet {
        key: "sex",
        column: "o.sex_id",
    },
    Fragment::ReferenceSet {
        key: "payment",
        column: "o.payment_id",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "order_datetime_start",
            "order_date_start",
            "order_datetime_end",
            "order_date_end",
        ),
        column: "o.order_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "payment_datetime_start",
            "payment_date_start",
            "payment_datetime_end",
            "payment_date_end",
        ),
        column: "o.payment_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "update_datetime_start",
            "update_date_start",
            "update_datetime_end",
            "update_date_end",
        ),
        column: "o.update_date",
    },
    Fragment::NumberRange {
        start: "payment_total_start",
        end: "payment_total_end",
        column: "o.payment_total",
    },
    Fragment::RelatedText {
        key: "buy_product_name",
        joins: ORDER_ITEMS,
        column: "oi.product_name",
        scoped_exclusion: None,
    },
    Fragment::MailFlag {
        key: "shipping_mail",
        column: "s.mail_send_date",
        unsent: SHIPPING_MAIL_UNSENT,
        sent: SHIPPING_MAIL_SENT,
    },
    Fragment::TextEquals {
        key: "tracking_number",
        column: "s.tracking_number",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::new(
            "shipping_delivery_datetime_start",
            "shipping_delivery_date_start",
            "shipping_delivery_datetime_end",
            "shipping_delivery_date_end",
        ),
        column: "s.shipping_delivery_date",
    },
];

static SCHEMA: DomainSchema = DomainSchema {
    key: DomainKey::OrderSearchAdmin,
    table: "dtb_order",
    alias: "o",
    id_column: "o.id",
    last_modified_column: "o.update_date",
    joins: &[SHIPPINGS],
    fields: FIELDS,
    status: Some(StatusPolicy {
        key: "status",
        exclusion: StatusExclusion {
            column: "o.order_status_id",
            transient: OrderStatus::TRANSIENT,
        },
        resolve: OrderStatus::resolve,
    }),
    kana_fields: &["kana"],
    sorts: &[
        SortField {
            name: "order",
            column: "o.id",
        },
        SortField {
            name: "order_no",
            column: "o.order_no",
        },
        SortField {
            name: "orderer",
            column: "o.name01",
        },
        SortField {
            name: "order_status",
            column: "o.order_status_id",
        },
        SortField {
            name: "purchase_price",
            column: "o.payment_total",
        },
        SortField {
            name: "order_date",
            column: "o.order_date",
        },
        SortField {
            name: "payment_method",
            column: "o.payment_method",
        },
        SortField {
            name: "shipping_date",
            column: "s.shipping_date",
        },
        SortField {
            name: "tracking_number",
            column: "s.tracking_number",
        },
    ],
};

/// Marker for the admin order search pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Order;

impl SearchDomain for Order {
    const KEY: DomainKey = DomainKey::OrderSearchAdmin;

    fn schema() -> &'static DomainSchema {
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_states_are_processing_and_pending() {
        assert_eq!(OrderStatus::TRANSIENT, &[8, 7]);
    }

    #[test]
    fn resolves_names_and_aliases() {
        assert_eq!(OrderStatus::resolve(&"delivered".into()), Some(5));
        assert_eq!(OrderStatus::resolve(&"Completed".into()), Some(5));
        assert_eq!(OrderStatus::resolve(&"IN_PROGRESS".into()), Some(4));
        assert_eq!(OrderStatus::resolve(&CriterionValue::Integer(8)), Some(8));
        assert_eq!(OrderStatus::resolve(&"2".into()), None);
    }
}
