//! # structq
//!
//! Compile-time checked SQL construction over struct field tokens.
//!
//! ## Overview
//!
//! - **No column strings**: a table's reference struct hands out one
//!   [`Column`] token per field, and every filter, assignment and ordering
//!   takes tokens instead of names
//! - **Typed builder states**: each call returns a view exposing only the
//!   next legal steps, so an `INSERT` with a `WHERE` does not compile
//! - **Consistent bind numbering**: every clause is rendered into one argument
//!   list, so `$n` always matches argument `n`
//! - **Dialect neutral**: quoting and placeholders come from a [`Dialect`]
//! - **Transaction-friendly**: any [`GenericClient`] runs a plan
//!
//! ```ignore
//! use structq::prelude::*;
//!
//! #[derive(Table, FromRow)]
//! #[orm(table = "invoices")]
//! struct Invoice {
//!     pub id: i64,
//!     pub person_id: i64,
//!     pub memo: String,
//!     pub is_paid: bool,
//! }
//!
//! let mut db = DbMap::new(DialectKind::Postgres);
//! db.add_table::<Invoice>();
//!
//! let inv = Invoice::reference();
//! let open = db
//!     .query(&client, &inv)
//!     .where_()
//!     .equal(inv.person_id, 7i64)
//!     .is_false(inv.is_paid)
//!     .order_by(inv.id, "desc")
//!     .limit(20)
//!     .select()
//!     .await?;
//! ```

// Lets derive output name `structq::...` inside this crate's own tests.
extern crate self as structq;

pub mod client;
pub mod config;
pub mod db_map;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod extension;
pub mod filter;
pub mod gate;
pub mod logging;
pub mod mapping;
pub mod param;
pub mod plan;
pub mod prelude;
pub mod row;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(test)]
mod test_support;

pub use client::GenericClient;
pub use config::DbMapConfig;
pub use db_map::DbMap;
pub use dialect::{Dialect, DialectKind, MySqlDialect, PostgresDialect, SqliteDialect};
pub use error::{OrmError, OrmResult, PlanError};
pub use executor::Executor;
pub use extension::{
    ExtensionKind, PgAssignJoinQuery, PgAssignQuery, PgJoinQuery, PgQuery, ilike,
};
pub use filter::{Filter, IntoOperand, JoinKind, Operand, SqlWrapper};
pub use gate::{AssignQuery, JoinQuery, Query, SelectQuery, UpdateQuery, WhereQuery};
pub use logging::{LogLevel, SqlLogConfig};
pub use mapping::{
    Column, FieldCursor, FieldDef, Fields, InstanceId, MapTarget, Reference, Table, TableMap,
};
pub use param::{Param, ParamList};
pub use plan::{Direction, JoinOp, JoinSpec, QueryPlan, Statement, StatementKind, SubQuery};
pub use row::{FromRow, RowExt};

// Derive output refers to `structq::tokio_postgres::Row`.
pub use tokio_postgres;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use structq_derive::{Embed, FromRow, Table};
