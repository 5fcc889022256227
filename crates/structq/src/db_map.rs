//! Table registry and query entry points.

use crate::config::DbMapConfig;
use crate::dialect::{Dialect, DialectKind};
use crate::error::PlanError;
use crate::extension::ExtensionKind;
use crate::gate::Query;
use crate::mapping::{MapTarget, Reference, Table, TableMap};
use crate::plan::{JoinOp, QueryPlan, SubQuery};
use std::any::TypeId;
use std::collections::HashMap;

/// Owns the dialect, the configuration and the registered tables.
///
/// Plans borrow the `DbMap`, so tables must be registered before queries are
/// built.
///
/// # Example
///
/// ```ignore
/// let mut db = DbMap::new(DialectKind::Postgres);
/// db.add_table::<Invoice>();
///
/// let inv = Invoice::reference();
/// let unpaid = db
///     .query(&client, &inv)
///     .where_()
///     .is_false(inv.is_paid)
///     .order_by(inv.created, "desc")
///     .select()
///     .await?;
/// ```
#[derive(Debug)]
pub struct DbMap {
    dialect: Box<dyn Dialect>,
    tables: HashMap<TypeId, TableMap>,
    config: DbMapConfig,
}

impl DbMap {
    pub fn new(dialect: DialectKind) -> Self {
        Self::from_config(DbMapConfig::new(dialect))
    }

    pub fn from_config(config: DbMapConfig) -> Self {
        Self {
            dialect: config.dialect.dialect(),
            tables: HashMap::new(),
            config,
        }
    }

    /// Use a custom dialect implementation.
    pub fn with_dialect(dialect: impl Dialect + 'static, config: DbMapConfig) -> Self {
        let config = DbMapConfig {
            dialect: dialect.kind(),
            ..config
        };
        Self {
            dialect: Box::new(dialect),
            tables: HashMap::new(),
            config,
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn config(&self) -> &DbMapConfig {
        &self.config
    }

    pub fn enable_extension(&mut self, extension: ExtensionKind) -> &mut Self {
        if !self.config.extensions.contains(&extension) {
            self.config.extensions.push(extension);
        }
        self
    }

    /// Whether `extension` is enabled and applies to this dialect.
    pub fn extension_enabled(&self, extension: ExtensionKind) -> bool {
        self.config.extensions.contains(&extension) && extension.supports(self.dialect.kind())
    }

    /// Register `T`, replacing any earlier registration.
    ///
    /// The returned map can be adjusted (schema, column names, transience)
    /// before the first query.
    pub fn add_table<T: Table>(&mut self) -> &mut TableMap {
        self.tables
            .entry(TypeId::of::<T>())
            .and_modify(|m| *m = TableMap::for_table::<T>())
            .or_insert_with(TableMap::for_table::<T>)
    }

    pub fn table<T: Table>(&self) -> Option<&TableMap> {
        self.tables.get(&TypeId::of::<T>())
    }

    pub(crate) fn table_for(&self, target: &dyn MapTarget) -> Result<&TableMap, PlanError> {
        self.tables
            .get(&target.model_type())
            .ok_or(PlanError::UnregisteredTable {
                type_name: target.model_name(),
            })
    }

    /// Start a query against the table of `target`.
    pub fn query<'a, E, R>(&'a self, executor: &'a E, target: &R) -> Query<'a, E, R::Model>
    where
        R: Reference,
    {
        Query::new(QueryPlan::new(self, executor, target, Vec::new()))
    }

    /// Start a query with join callbacks for transient fields of `target`.
    pub fn query_with<'a, E, R>(
        &'a self,
        executor: &'a E,
        target: &R,
        join_ops: Vec<JoinOp>,
    ) -> Query<'a, E, R::Model>
    where
        R: Reference,
    {
        Query::new(QueryPlan::new(self, executor, target, join_ops))
    }

    /// Start a query selecting from a rendered sub-query.
    pub fn query_subquery<'a, E, M>(&'a self, executor: &'a E, sub: SubQuery<M>) -> Query<'a, E, M>
    where
        M: Table,
    {
        Query::new(QueryPlan::from_subquery(self, executor, sub))
    }
}
