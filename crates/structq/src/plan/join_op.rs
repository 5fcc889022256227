//! Join callbacks for transient fields.
//!
//! A transient field can be filled from another table: when the field is
//! added to the select list, its callback decides which table to join, how
//! to join it and what to select in the field's place.

use crate::filter::{Filter, IntoOperand, JoinKind, Operand};
use crate::mapping::{Column, InstanceId, MapTarget};
use std::fmt;
use std::sync::Arc;

/// Callback type stored on a field. Receives the owning instance and the
/// field being selected.
pub type JoinFn = Arc<dyn Fn(InstanceId, Column) -> Option<JoinSpec> + Send + Sync>;

/// Join performed when a field is selected.
pub struct JoinSpec {
    pub(crate) kind: JoinKind,
    pub(crate) target: Box<dyn MapTarget>,
    pub(crate) alias: Option<String>,
    pub(crate) selection: Operand,
    pub(crate) constraints: Vec<Filter>,
}

impl JoinSpec {
    pub fn new(kind: JoinKind, target: impl MapTarget + 'static, selection: impl IntoOperand) -> Self {
        Self {
            kind,
            target: Box::new(target),
            alias: None,
            selection: selection.into_operand(),
            constraints: Vec::new(),
        }
    }

    pub fn inner(target: impl MapTarget + 'static, selection: impl IntoOperand) -> Self {
        Self::new(JoinKind::Inner, target, selection)
    }

    pub fn left(target: impl MapTarget + 'static, selection: impl IntoOperand) -> Self {
        Self::new(JoinKind::LeftOuter, target, selection)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add an ON condition.
    pub fn on(mut self, constraint: Filter) -> Self {
        self.constraints.push(constraint);
        self
    }
}

impl fmt::Debug for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinSpec")
            .field("kind", &self.kind)
            .field("target", &self.target.model_name())
            .field("alias", &self.alias)
            .field("selection", &self.selection)
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// Registers a join callback for one field of the query target.
#[derive(Clone)]
pub struct JoinOp {
    pub(crate) field: Column,
    pub(crate) join: JoinFn,
}

impl JoinOp {
    pub fn new<F>(field: Column, join: F) -> Self
    where
        F: Fn(InstanceId, Column) -> Option<JoinSpec> + Send + Sync + 'static,
    {
        Self {
            field,
            join: Arc::new(join),
        }
    }

    pub fn field(&self) -> Column {
        self.field
    }
}

impl fmt::Debug for JoinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOp").field("field", &self.field).finish()
    }
}
