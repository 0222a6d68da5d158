//! Shipment search for the admin back-office.

use crate::domains::{DomainKey, DomainSchema, OrderStatus, SearchDomain};
use crate::filters::DateRangeKeys;
use crate::search::{
    Col, Fragment, JoinDef, JoinKind, MultiBranch, StatusExclusion, StatusPolicy,
};

const NAME: &[&str] = &["s.name01", "s.name02"];
const KANA: &[&str] = &["s.kana01", "s.kana02"];
const ORDER_NAME: &[&str] = &["o.name01", "o.name02"];
const ORDER_KANA: &[&str] = &["o.kana01", "o.kana02"];
const PHONE: &[&str] = &["s.phone_number01", "s.phone_number02", "s.phone_number03"];

// A shipment reaches its order through the items it carries.
const JOINS: &[JoinDef] = &[
    JoinDef {
        kind: JoinKind::Left,
        table: "dtb_order_item",
        alias: "si",
        on: "si.shipping_id = s.id",
        fans_out: true,
    },
    JoinDef {
        kind: JoinKind::Left,
        table: "dtb_order",
        alias: "o",
        on: "o.id = si.order_id",
        fans_out: false,
    },
];

const FIELDS: &[Fragment] = &[
    Fragment::IdRange {
        start: "shipping_id_start",
        end: "shipping_id_end",
        column: "s.id",
    },
    Fragment::MultiText {
        key: "multi",
        id_column: Some("s.id"),
        branches: &[
            MultiBranch::Cleaned(Col::Concat(NAME)),
            MultiBranch::Cleaned(Col::ConcatCoalesced(KANA)),
            MultiBranch::Raw(Col::Field("s.company_name")),
        ],
    },
    Fragment::IdEquals {
        key: "order_id",
        column: "o.id",
    },
    Fragment::Contains {
        key: "order_no",
        column: Col::Field("o.order_no"),
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
        key: "order_name",
        column: Col::Concat(ORDER_NAME),
        strip_whitespace: true,
    },
    Fragment::Contains {
        key: "order_kana",
        column: Col::ConcatCoalesced(ORDER_KANA),
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
        key: "payment",
        column: "o.payment_id",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::dates_only("order_date_start", "order_date_end"),
        column: "o.order_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::dates_only(
            "shipping_delivery_date_start",
            "shipping_delivery_date_end",
        ),
        column: "s.shipping_delivery_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::dates_only("shipping_date_start", "shipping_date_end"),
        column: "s.shipping_date",
    },
    Fragment::DateRange {
        keys: DateRangeKeys::dates_only("update_date_start", "update_date_end"),
        column: "s.update_date",
    },
    Fragment::NumberRange {
        start: "payment_total_start",
        end: "payment_total_end",
        column: "o.payment_total",
    },
    Fragment::Contains {
        key: "buy_product_name",
        column: Col::Field("si.product_name"),
        strip_whitespace: false,
    },
];

static SCHEMA: DomainSchema = DomainSchema {
    key: DomainKey::ShippingSearchAdmin,
    table: "dtb_shipping",
    alias: "s",
    id_column: "s.id",
    last_modified_column: "s.update_date",
    joins: JOINS,
    fields: FIELDS,
    status: Some(StatusPolicy {
        key: "order_status",
        exclusion: StatusExclusion {
            column: "o.order_status_id",
            transient: OrderStatus::TRANSIENT,
        },
        resolve: OrderStatus::resolve,
    }),
    kana_fields: &["kana", "order_kana"],
    // Shipments are always listed most recently updated first.
    sorts: &[],
};

/// Marker for the admin shipment search pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Shipping;

impl SearchDomain for Shipping {
    const KEY: DomainKey = DomainKey::ShippingSearchAdmin;

    fn schema() -> &'static DomainSchema {
        &SCHEMA
    }
}
