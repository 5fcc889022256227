//! Common imports.
//!
//! ```ignore
//! use structq::prelude::*;
//! ```

pub use crate::config::DbMapConfig;
pub use crate::db_map::DbMap;
pub use crate::dialect::DialectKind;
pub use crate::error::{OrmError, OrmResult, PlanError};
pub use crate::executor::Executor;
pub use crate::extension::{ExtensionKind, ilike};
pub use crate::filter::{Filter, IntoOperand, case_when, cast, coalesce, function, lower, upper};
pub use crate::mapping::{Column, Fields, Reference, Table};
pub use crate::plan::{JoinOp, JoinSpec};
pub use crate::row::{FromRow, RowExt};

#[cfg(feature = "derive")]
pub use structq_derive::{Embed, FromRow, Table};
