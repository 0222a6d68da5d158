//! Reference SQL adapter.
//!
//! Renders a [`SearchQuery`] into parameterized SQL for one of the supported
//! engines. Every operand is bound; only column names declared by domain
//! schemas (or hooks) are spliced into the statement text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SearchError;
use crate::search::{ColumnExpr, Predicate, SearchQuery, SortOrder, Value};

/// Storage engine the rendered statement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    #[default]
    Postgres,
    MySql,
    Sqlite,
}

impl DatabaseEngine {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::MySql => "mysql",
            DatabaseEngine::Sqlite => "sqlite",
        }
    }

    /// Whether integer literals above the 32-bit maximum make the statement fail.
    #[inline]
    pub const fn rejects_integer_overflow(self) -> bool {
        matches!(self, DatabaseEngine::Postgres)
    }

    fn placeholder(self, index: usize) -> String {
        match self {
            DatabaseEngine::Postgres => format!("${index}"),
            DatabaseEngine::MySql | DatabaseEngine::Sqlite => "?".to_string(),
        }
    }

    /// `ESCAPE` literal for backslash; MySQL treats `\` inside string literals as an escape itself.
    fn like_escape(self) -> &'static str {
        match self {
            DatabaseEngine::MySql => r"'\\'",
            DatabaseEngine::Postgres | DatabaseEngine::Sqlite => r"'\'",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseEngine {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DatabaseEngine::Postgres),
            "mysql" | "mariadb" => Ok(DatabaseEngine::MySql),
            "sqlite" => Ok(DatabaseEngine::Sqlite),
            other => Err(SearchError::invalid_request(format!(
                "unknown database engine '{other}'"
            ))),
        }
    }
}

/// One page of results, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Clamps `page` to at least 1 and `page_size` to `1..=max_page_size`.
    pub fn new(page: u32, page_size: u32, max_page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, max_page_size.max(1)),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Rendered statement and its positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// Pushes a bind parameter and returns its 1-based position.
fn push_bind(binds: &mut Vec<Value>, value: Value) -> usize {
    binds.push(value);
    binds.len()
}

/// Escape LIKE meta-characters so user input is matched literally.
pub fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

const AND: &str = " AND ";
const OR: &str = " OR ";

#[derive(Debug, Clone, Copy)]
pub struct SqlRenderer {
    engine: DatabaseEngine,
}

impl SqlRenderer {
    pub fn new(engine: DatabaseEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    /// `SELECT` of root rows, ordered, optionally paginated.
    ///
    /// When a join can repeat root rows the statement is grouped on the root
    /// id, so every root row appears once and pages agree with [`count`].
    /// A sort column from a joined table then orders by its `MIN` (ascending)
    /// or `MAX` (descending) over the group.
    ///
    /// [`count`]: SqlRenderer::count
    pub fn select(&self, query: &SearchQuery, pagination: Option<Pagination>) -> SqlStatement {
        let mut binds = Vec::new();
        let root = query.alias();
        let mut sql = format!("SELECT {root}.* FROM {} {root}", query.table());
        self.write_joins(&mut sql, query);
        self.write_where(&mut sql, query, &mut binds);
        if query.fans_out() {
            sql.push_str(&format!(" GROUP BY {root}.id"));
        }

        let root_prefix = format!("{root}.");
        let order_by: Vec<String> = query
            .sort()
            .keys()
            .map(|key| {
                if query.fans_out() && !key.column.starts_with(&root_prefix) {
                    let aggregate = match key.order {
                        SortOrder::Asc => "MIN",
                        SortOrder::Desc => "MAX",
                    };
                    format!("{aggregate}({}) {}", key.column, key.order.as_str())
                } else {
                    format!("{} {}", key.column, key.order.as_str())
                }
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_by.join(", "));

        if let Some(page) = pagination {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", page.page_size, page.offset()));
        }
        SqlStatement { sql, binds }
    }

    /// Number of distinct root rows matching the query.
    pub fn count(&self, query: &SearchQuery) -> SqlStatement {
        let mut binds = Vec::new();
        let root = query.alias();
        let counted = if query.fans_out() {
            format!("COUNT(DISTINCT {root}.id)")
        } else {
            "COUNT(*)".to_string()
        };
        let mut sql = format!("SELECT {counted} FROM {} {root}", query.table());
        self.write_joins(&mut sql, query);
        self.write_where(&mut sql, query, &mut binds);
        SqlStatement { sql, binds }
    }

    fn write_joins(&self, sql: &mut String, query: &SearchQuery) {
        for join in query.joins() {
            sql.push_str(&format!(
                " {} {} {} ON {}",
                join.kind.as_str(),
                join.table,
                join.alias,
                join.on
            ));
        }
    }

    fn write_where(&self, sql: &mut String, query: &SearchQuery, binds: &mut Vec<Value>) {
        if let Some(clause) = self.render_predicate(&query.predicate(), binds) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
    }

    /// Renders one predicate; `None` when it places no constraint.
    pub fn render_predicate(
        &self,
        predicate: &Predicate,
        binds: &mut Vec<Value>,
    ) -> Option<String> {
        match predicate {
            Predicate::Compare {
                column,
                comparator,
                value,
            } => {
                let idx = push_bind(binds, value.clone());
                Some(format!(
                    "{} {} {}",
                    self.render_column(column),
                    comparator.as_str(),
                    self.engine.placeholder(idx)
                ))
            }
            Predicate::Contains { column, needle } => {
                let pattern = format!("%{}%", escape_like_pattern(needle));
                let idx = push_bind(binds, Value::Text(pattern));
                Some(format!(
                    "{} LIKE {} ESCAPE {}",
                    self.render_column(column),
                    self.engine.placeholder(idx),
                    self.engine.like_escape()
                ))
            }
            Predicate::In { column, values } => {
                if values.is_empty() {
                    return Some("1 = 0".to_string());
                }
                Some(format!(
                    "{} IN ({})",
                    self.render_column(column),
                    self.placeholders(values, binds)
                ))
            }
            Predicate::NotIn { column, values } => {
                if values.is_empty() {
                    return None;
                }
                Some(format!(
                    "{} NOT IN ({})",
                    self.render_column(column),
                    self.placeholders(values, binds)
                ))
            }
            Predicate::IsNull { column } => Some(format!("{} IS NULL", self.render_column(column))),
            Predicate::IsNotNull { column } => {
                Some(format!("{} IS NOT NULL", self.render_column(column)))
            }
            Predicate::And { children } => self.render_group(children, AND, binds),
            Predicate::Or { children } => self.render_group(children, OR, binds),
        }
    }

    fn render_group(
        &self,
        children: &[Predicate],
        separator: &str,
        binds: &mut Vec<Value>,
    ) -> Option<String> {
        let disjunction = separator == OR;
        let mark = binds.len();
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            match self.render_predicate(child, binds) {
                Some(part) => parts.push(part),
                // An unconstrained branch makes the whole disjunction unconstrained.
                None if disjunction => {
                    binds.truncate(mark);
                    return None;
                }
                None => {}
            }
        }
        match parts.len() {
            0 => None,
            1 => parts.into_iter().next(),
            _ => Some(format!("({})", parts.join(separator))),
        }
    }

    fn placeholders(&self, values: &[Value], binds: &mut Vec<Value>) -> String {
        values
            .iter()
            .map(|value| self.engine.placeholder(push_bind(binds, value.clone())))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn render_column(&self, column: &ColumnExpr) -> String {
        match column {
            ColumnExpr::Column(name) => name.clone(),
            ColumnExpr::Concat(parts) => self.concat(parts.iter().cloned()),
            ColumnExpr::ConcatCoalesced(parts) => {
                self.concat(parts.iter().map(|part| format!("COALESCE({part}, '')")))
            }
            ColumnExpr::Month(name) => match self.engine {
                DatabaseEngine::Postgres => format!("EXTRACT(MONTH FROM {name})"),
                DatabaseEngine::MySql => format!("MONTH({name})"),
                DatabaseEngine::Sqlite => format!("CAST(strftime('%m', {name}) AS INTEGER)"),
            },
        }
    }

    fn concat(&self, parts: impl Iterator<Item = String>) -> String {
        let parts: Vec<String> = parts.collect();
        match self.engine {
            DatabaseEngine::Sqlite => format!("({})", parts.join(" || ")),
            DatabaseEngine::Postgres | DatabaseEngine::MySql => {
                format!("CONCAT({})", parts.join(", "))
            }
        }
    }
}
