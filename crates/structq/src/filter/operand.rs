//! Values that appear inside filters, ORDER BY and computed selects.

use crate::mapping::Column;
use crate::param::Param;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Something that renders to exactly one SQL fragment.
#[derive(Clone, Debug)]
pub enum Operand {
    /// A mapped field, resolved to `table.column` (or its select target).
    Column(Column),
    /// A literal, rendered as the next bind variable.
    Value(Param),
    /// An expression built around other operands.
    Wrapped(Arc<dyn SqlWrapper>),
}

impl Operand {
    pub fn wrap(wrapper: impl SqlWrapper + 'static) -> Self {
        Operand::Wrapped(Arc::new(wrapper))
    }

    /// Whether rendering this operand touches at least one field.
    pub fn references_column(&self) -> bool {
        match self {
            Operand::Column(_) => true,
            Operand::Value(_) => false,
            Operand::Wrapped(w) => w.actual_values().iter().any(|v| v.references_column()),
        }
    }
}

/// Extension point for SQL expressions around operands.
///
/// Rendering is two-phase: the plan resolves every operand returned by
/// `actual_values` (bind variable or column reference, in order) and hands
/// the resulting strings to `wrap_sql`.
pub trait SqlWrapper: fmt::Debug + Send + Sync {
    fn actual_values(&self) -> Vec<&Operand>;

    /// `values.len()` always equals `actual_values().len()`.
    fn wrap_sql(&self, values: &[String]) -> String;
}

/// Conversion into an [`Operand`].
///
/// Field tokens become column references, any `ToSql` value becomes a bind
/// variable.
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for Column {
    fn into_operand(self) -> Operand {
        Operand::Column(self)
    }
}

impl IntoOperand for Param {
    fn into_operand(self) -> Operand {
        Operand::Value(self)
    }
}

impl<T> IntoOperand for T
where
    T: ToSql + Send + Sync + 'static,
{
    fn into_operand(self) -> Operand {
        Operand::Value(Param::new(self))
    }
}

impl From<Column> for Operand {
    fn from(column: Column) -> Self {
        Operand::Column(column)
    }
}
