use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use sift::search::{DatabaseEngine, SqlRenderer, Value};
use sift::{
    Customer, DomainKey, Order, SearchCriteria, SearchEngine, SearchQuery, Shipping, SiftConfig,
};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Render a Search",
        commands: &[
            "sift render order --criteria search.json            # SELECT for page 1",
            "sift render customer --json '{\"multi\": \"yamada\"}'  # Inline criteria",
            "sift render shipping --criteria - < search.json     # Criteria from stdin",
        ],
    },
    ExampleGroup {
        title: "Engines and Paging",
        commands: &[
            "sift render order --json '{}' --engine mysql         # MySQL placeholders",
            "sift render order --json '{}' --page 3 --page-size 20",
            "sift render order --json '{}' --count --output json # COUNT statement as JSON",
        ],
    },
];

#[derive(Args)]
pub struct RenderArgs {
    /// Search domain: customer, order or shipping
    pub domain: String,

    /// JSON file holding the criteria object ("-" reads stdin)
    #[arg(long, short = 'c', conflicts_with = "json")]
    pub criteria: Option<PathBuf>,

    /// Criteria object given inline
    #[arg(long)]
    pub json: Option<String>,

    /// Target engine, overriding configuration (postgres, mysql, sqlite)
    #[arg(long)]
    pub engine: Option<String>,

    /// Page number, 1-based
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page, clamped to the configured maximum
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Render the COUNT statement instead of the page SELECT
    #[arg(long)]
    pub count: bool,
}

/// Rendered statement plus the composition details behind it.
#[derive(Serialize)]
struct RenderReport {
    domain: DomainKey,
    engine: DatabaseEngine,
    predicate: String,
    normalized: BTreeMap<String, String>,
    sql: String,
    binds: Vec<Value>,
}

impl TableDisplay for RenderReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Item", "Value"]);
        table.add_row(vec![Cell::new("Domain"), Cell::new(self.domain.as_str())]);
        table.add_row(vec![Cell::new("Engine"), Cell::new(self.engine.as_str())]);
        table.add_row(vec![Cell::new("Predicate"), Cell::new(&self.predicate)]);
        for (key, value) in &self.normalized {
            table.add_row(vec![Cell::new(format!("Normalized {key}")), Cell::new(value)]);
        }
        table.add_row(vec![Cell::new("SQL"), Cell::new(&self.sql)]);
        for (index, bind) in self.binds.iter().enumerate() {
            table.add_row(vec![
                Cell::new(format!("Bind {}", index + 1)),
                Cell::new(bind.to_string()),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let binds: Vec<String> = self.binds.iter().map(ToString::to_string).collect();
        format!("{} -- [{}]", self.sql, binds.join(", "))
    }
}

pub fn handle_render(args: RenderArgs, config: &SiftConfig, output: &OutputManager) -> Result<()> {
    let domain: DomainKey = args.domain.parse()?;

    let mut config = config.clone();
    if let Some(engine) = args.engine.as_deref() {
        config.database.engine = engine.parse()?;
    }

    let criteria = read_criteria(&args)?;
    output.verbose(&format!("{} criteria supplied", criteria.len()));

    let query = build_query(domain, &config, &criteria);
    if query.conditions().is_empty() {
        output.info("No criterion constrains this search");
    }

    let renderer = SqlRenderer::new(config.database.engine);
    let statement = if args.count {
        renderer.count(&query)
    } else {
        renderer.select(&query, Some(config.pagination(args.page, args.page_size)))
    };

    output.heading(&format!("{domain} ({})", config.database.engine));
    output.display(&RenderReport {
        domain,
        engine: config.database.engine,
        predicate: query.predicate().to_string(),
        normalized: query.normalized().clone(),
        sql: statement.sql,
        binds: statement.binds,
    })
}

fn read_criteria(args: &RenderArgs) -> Result<SearchCriteria> {
    let json = match (&args.criteria, &args.json) {
        (_, Some(inline)) => inline.clone(),
        (Some(path), None) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read criteria from stdin")?;
            buffer
        }
        (Some(path), None) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read criteria file {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide criteria with --criteria FILE or --json '{{...}}'"),
    };
    SearchCriteria::from_json_str(&json).context("Failed to parse criteria")
}

fn build_query(domain: DomainKey, config: &SiftConfig, criteria: &SearchCriteria) -> SearchQuery {
    match domain {
        DomainKey::CustomerSearch => SearchEngine::<Customer>::from_config(config).build(criteria),
        DomainKey::OrderSearchAdmin => SearchEngine::<Order>::from_config(config).build(criteria),
        DomainKey::ShippingSearchAdmin => {
            SearchEngine::<Shipping>::from_config(config).build(criteria)
        }
    }
}
