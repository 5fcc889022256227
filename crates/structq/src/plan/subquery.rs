use super::{QueryPlan, Statement};
use crate::error::PlanError;
use crate::mapping::{FieldColumnMap, InstanceId};
use std::marker::PhantomData;

/// A SELECT rendered for use as another query's FROM clause.
///
/// The outer query keeps using the same field tokens; selected columns are
/// re-qualified with the sub-query alias. Columns that were computed inside
/// the sub-query (join callbacks, `select_as`) become plain columns of the
/// alias.
pub struct SubQuery<M> {
    pub(crate) statement: Result<Statement, PlanError>,
    pub(crate) quoted_alias: String,
    pub(crate) quoted_table: String,
    pub(crate) target: Option<InstanceId>,
    pub(crate) entries: Vec<FieldColumnMap>,
    _model: PhantomData<fn() -> M>,
}

impl<M> SubQuery<M> {
    pub fn statement(&self) -> Result<&Statement, &PlanError> {
        self.statement.as_ref()
    }
}

impl<M> std::fmt::Debug for SubQuery<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubQuery")
            .field("statement", &self.statement)
            .field("alias", &self.quoted_alias)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a, E, M> QueryPlan<'a, E, M> {
    pub(crate) fn to_subquery(&self, alias: &str) -> SubQuery<M> {
        let quoted_alias = self.db.dialect().quote_field(alias);
        let entries = self
            .col_map
            .iter()
            .filter(|e| e.do_select)
            .map(|e| {
                let mut entry = e.clone();
                entry.quoted_table = quoted_alias.clone();
                if entry.select_target.take().is_some() {
                    entry.transient = false;
                }
                entry.join = None;
                entry
            })
            .collect();
        SubQuery {
            statement: self.select_statement(),
            quoted_alias,
            quoted_table: self.quoted_table.clone(),
            target: self.target,
            entries,
            _model: PhantomData,
        }
    }
}
