//! Database-specific SQL syntax.
//!
//! The plan never writes a quote character or a placeholder itself; every
//! identifier and bind variable goes through the [`Dialect`] it was built
//! with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which built-in dialect a [`DbMap`](crate::DbMap) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

impl DialectKind {
    /// Instantiate the dialect.
    pub fn dialect(self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Postgres => Box::new(PostgresDialect),
            DialectKind::Mysql => Box::new(MySqlDialect),
            DialectKind::Sqlite => Box::new(SqliteDialect),
        }
    }
}

pub trait Dialect: Send + Sync + fmt::Debug {
    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> &'static str;

    fn kind(&self) -> DialectKind;

    /// Wraps a column name in the correct quotation marks for the dialect.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_field(&self, name: &str) -> String;

    /// Quoted, schema-qualified table name as it appears in FROM/JOIN.
    fn quoted_table_for_query(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) if !schema.is_empty() => {
                format!("{}.{}", self.quote_field(schema), self.quote_field(table))
            }
            _ => self.quote_field(table),
        }
    }

    /// Placeholder for the bind variable at 0-based `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn bind_var(&self, index: usize) -> String;

    /// `LIMIT <bind>` for dialects without `FETCH NEXT`.
    ///
    /// `None` means the standard `FETCH NEXT (<bind>) ROWS ONLY` form, placed
    /// after OFFSET.
    fn limit(&self, bind_var: &str) -> Option<String> {
        let _ = bind_var;
        None
    }
}

fn quote_with(ident: &str, quote: char) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push(quote);
    for ch in ident.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn quote_field(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn bind_var(&self, index: usize) -> String {
        format!("${}", index + 1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn quote_field(&self, name: &str) -> String {
        quote_with(name, '`')
    }

    fn bind_var(&self, _index: usize) -> String {
        "?".into()
    }

    fn limit(&self, bind_var: &str) -> Option<String> {
        Some(format!("LIMIT {}", bind_var))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn quote_field(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn bind_var(&self, _index: usize) -> String {
        "?".into()
    }

    fn limit(&self, bind_var: &str) -> Option<String> {
        Some(format!("LIMIT {}", bind_var))
    }
}
