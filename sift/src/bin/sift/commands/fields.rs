use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use sift::DomainKey;
use sift::domains::{DomainSchema, SORT_KEY, SORT_TYPE};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, bullet_line, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "List Criteria",
    commands: &[
        "sift fields order                  # Criteria the order search understands",
        "sift fields customer --output json # Same, as JSON",
    ],
}];

#[derive(Args)]
pub struct FieldsArgs {
    /// Search domain: customer, order or shipping
    pub domain: String,
}

#[derive(Serialize)]
struct FieldRow {
    criteria: Vec<&'static str>,
    matching: &'static str,
}

#[derive(Serialize)]
struct FieldsReport {
    domain: DomainKey,
    table: &'static str,
    fields: Vec<FieldRow>,
    sort_keys: Vec<&'static str>,
}

impl FieldsReport {
    fn from_schema(schema: &'static DomainSchema) -> Self {
        let mut fields: Vec<FieldRow> = schema
            .fields
            .iter()
            .map(|fragment| FieldRow {
                criteria: fragment.keys(),
                matching: fragment.describe(),
            })
            .collect();
        if let Some(status) = &schema.status {
            fields.push(FieldRow {
                criteria: vec![status.key],
                matching: "status in set, transient states hidden otherwise",
            });
        }
        if !schema.sorts.is_empty() {
            fields.push(FieldRow {
                criteria: vec![SORT_KEY, SORT_TYPE],
                matching: "sort key and direction (a = ascending)",
            });
        }

        Self {
            domain: schema.key,
            table: schema.table,
            fields,
            sort_keys: schema.sorts.iter().map(|sort| sort.name).collect(),
        }
    }
}

impl TableDisplay for FieldsReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Criteria", "Match"]);
        for row in &self.fields {
            table.add_row(vec![Cell::new(row.criteria.join("\n")), Cell::new(row.matching)]);
        }
        if !self.sort_keys.is_empty() {
            table.add_row(vec![Cell::new("sortkey values"), Cell::new(self.sort_keys.join(", "))]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        self.fields
            .iter()
            .map(|row| bullet_line(&options, &row.criteria.join(",")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_fields(args: FieldsArgs, output: &OutputManager) -> Result<()> {
    let domain: DomainKey = args.domain.parse()?;
    let schema = domain.schema();

    output.heading(&format!("{domain} on {}", schema.table));
    output.display(&FieldsReport::from_schema(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipping_has_no_sort_row() {
        let report = FieldsReport::from_schema(DomainKey::ShippingSearchAdmin.schema());
        assert!(report.sort_keys.is_empty());
        assert!(report.fields.iter().all(|row| !row.criteria.contains(&SORT_KEY)));
        assert!(report.fields.iter().any(|row| row.criteria == ["order_status"]));
    }

    #[test]
    fn compact_lists_one_row_per_fragment() {
        let schema = DomainKey::CustomerSearch.schema();
        let report = FieldsReport::from_schema(schema);
        let compact = report.to_compact();

        assert_eq!(compact.lines().count(), schema.fields.len() + 2);
        assert!(compact.starts_with("• multi"));
    }
}
