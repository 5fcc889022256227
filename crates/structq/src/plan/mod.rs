//! The query plan: one stateful builder behind every typed view.
//!
//! A plan collects the target table, joined tables, filters, assignments and
//! select modifiers. Construction never fails outright: errors are recorded
//! and the first one is returned by whichever terminal runs first. Rendering
//! happens per terminal call into a fresh [`Statement`], so bind numbering
//! always starts over.

mod exec;
mod join_op;
mod order;
mod render;
mod statement;
mod subquery;


pub use join_op::{JoinFn, JoinOp, JoinSpec};
pub use order::{Direction, Order};
pub use statement::{Statement, StatementKind};
pub use subquery::SubQuery;

use crate::db_map::DbMap;
use crate::dialect::Dialect;
use crate::error::PlanError;
use crate::extension::ExtensionKind;
use crate::filter::{Filter, JoinFilter, JoinKind, Operand};
use crate::mapping::{
    Column, FieldColumnMap, InstanceId, MapTarget, StructColumnMap, TableAndColumnLocator,
};
use crate::param::{Param, ParamList};
use std::marker::PhantomData;

/// Which clause the filter methods currently feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveFilter {
    None,
    Join(usize),
    Where,
}

#[derive(Debug, Clone)]
struct ForUpdate {
    of: Option<String>,
}

pub struct QueryPlan<'a, E, M> {
    db: &'a DbMap,
    executor: &'a E,
    errors: Vec<PlanError>,
    target: Option<InstanceId>,
    /// Quoted target table, used by INSERT/UPDATE/DELETE/TRUNCATE.
    quoted_table: String,
    /// FROM clause of SELECT/COUNT: the quoted table or a sub-query.
    from_clause: String,
    col_map: StructColumnMap,
    joins: Vec<JoinFilter>,
    where_filter: Filter,
    active: ActiveFilter,
    assign_cols: Vec<String>,
    assign_bind_vars: Vec<String>,
    assign_args: ParamList,
    sub_args: ParamList,
    order_by: Vec<Order>,
    group_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    distinct_on: Vec<Operand>,
    for_update: Option<ForUpdate>,
    _model: PhantomData<fn() -> M>,
}

impl<'a, E, M> QueryPlan<'a, E, M> {
    fn empty(db: &'a DbMap, executor: &'a E) -> Self {
        Self {
            db,
            executor,
            errors: Vec::new(),
            target: None,
            quoted_table: String::new(),
            from_clause: String::new(),
            col_map: StructColumnMap::new(),
            joins: Vec::new(),
            where_filter: Filter::And(Vec::new()),
            active: ActiveFilter::None,
            assign_cols: Vec::new(),
            assign_bind_vars: Vec::new(),
            assign_args: ParamList::new(),
            sub_args: ParamList::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            limit: None,
            offset: None,
            distinct_on: Vec::new(),
            for_update: None,
            _model: PhantomData,
        }
    }

    pub(crate) fn new(
        db: &'a DbMap,
        executor: &'a E,
        target: &dyn MapTarget,
        join_ops: Vec<JoinOp>,
    ) -> Self {
        let mut plan = Self::empty(db, executor);
        match plan.map_table(target, true, None) {
            Ok((quoted_table, _)) => {
                plan.target = Some(target.instance());
                plan.from_clause = quoted_table.clone();
                plan.quoted_table = quoted_table;
            }
            Err(e) => plan.push_error(e),
        }
        for op in join_ops {
            match plan.col_map.join_map_for(op.field) {
                Ok(entry) => entry.join = Some(op.join),
                Err(e) => plan.push_error(e),
            }
        }
        plan
    }

    pub(crate) fn from_subquery(db: &'a DbMap, executor: &'a E, sub: SubQuery<M>) -> Self {
        let mut plan = Self::empty(db, executor);
        plan.target = sub.target;
        plan.quoted_table = sub.quoted_table;
        match sub.statement {
            Ok(statement) => {
                plan.from_clause = format!("({}) AS {}", statement.sql, sub.quoted_alias);
                plan.sub_args = statement.args;
            }
            Err(e) => plan.push_error(e),
        }
        for entry in sub.entries {
            plan.col_map.push(entry);
        }
        plan
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.db.dialect()
    }

    /// Errors recorded so far, in the order they happened.
    pub fn errors(&self) -> &[PlanError] {
        &self.errors
    }

    pub fn column_map(&self) -> &StructColumnMap {
        &self.col_map
    }

    /// Id of the reference the plan was started with.
    pub fn target(&self) -> Option<InstanceId> {
        self.target
    }

    pub fn locate_column(&self, field: Column) -> Result<String, PlanError> {
        self.col_map.locate_column(field)
    }

    pub fn locate_table_and_column(&self, field: Column) -> Result<String, PlanError> {
        self.col_map.locate_table_and_column(field)
    }

    pub(crate) fn push_error(&mut self, error: PlanError) {
        tracing::debug!(target: "structq.plan", error = %error, "query construction error recorded");
        self.errors.push(error);
    }

    /// Map every column of `target`'s table into the plan.
    ///
    /// Returns the quoted table and the quoted alias, if any. Columns of an
    /// aliased table are qualified with the alias.
    fn map_table(
        &mut self,
        target: &dyn MapTarget,
        select: bool,
        alias: Option<&str>,
    ) -> Result<(String, Option<String>), PlanError> {
        let db = self.db;
        let dialect = db.dialect();
        let table = db.table_for(target)?;
        let instance = target.instance();
        if self.col_map.contains_instance(instance) {
            return Err(PlanError::DuplicateTarget {
                type_name: target.model_name(),
            });
        }
        if table.queryable_count() == 0 {
            return Err(PlanError::NoMappableFields {
                type_name: target.model_name(),
            });
        }

        let quoted_table = dialect.quoted_table_for_query(table.schema(), table.name());
        let quoted_alias = alias.map(|a| dialect.quote_field(a));
        let qualifier = quoted_alias.as_ref().unwrap_or(&quoted_table);
        for (index, column) in table.columns().iter().enumerate() {
            self.col_map.push(FieldColumnMap {
                parent: instance,
                field: Column::new(instance, index as u32),
                field_name: column.field_name(),
                column_name: column.column_name().to_string(),
                transient: column.is_transient(),
                quoted_table: qualifier.clone(),
                quoted_column: dialect.quote_field(column.column_name()),
                select_target: None,
                do_select: select && !column.is_transient(),
                join: None,
            });
        }
        Ok((quoted_table, quoted_alias))
    }

    pub(crate) fn join_table(
        &mut self,
        kind: JoinKind,
        target: &dyn MapTarget,
        alias: Option<&str>,
    ) {
        let join = match self.map_table(target, false, alias) {
            Ok((quoted_table, quoted_alias)) => JoinFilter::new(kind, quoted_table, quoted_alias),
            Err(e) => {
                self.push_error(e);
                JoinFilter::new(kind, String::new(), None)
            }
        };
        self.joins.push(join);
        self.active = ActiveFilter::Join(self.joins.len() - 1);
    }

    /// Switch the filter methods over to the WHERE clause.
    pub(crate) fn open_where(&mut self) {
        self.active = ActiveFilter::Where;
    }

    pub(crate) fn add_filter(&mut self, filter: Filter) {
        if let Err(e) = filter.validate() {
            self.push_error(e);
            return;
        }
        match self.active {
            ActiveFilter::Join(index) => self.joins[index].add(filter),
            ActiveFilter::Where => self.where_filter.add(filter),
            ActiveFilter::None => {
                self.active = ActiveFilter::Where;
                self.where_filter.add(filter);
            }
        }
    }

    pub(crate) fn add_filter_result(&mut self, filter: Result<Filter, PlanError>) {
        match filter {
            Ok(filter) => self.add_filter(filter),
            Err(e) => self.push_error(e),
        }
    }

    /// Assignments only target stored columns of the query's own table.
    pub(crate) fn assign(&mut self, field: Column, value: Param) {
        let misplaced = self.col_map.get(field).and_then(|entry| {
            if Some(entry.parent) != self.target {
                Some(PlanError::AssignOutsideTarget {
                    field: entry.field_name.to_string(),
                })
            } else if entry.transient {
                Some(PlanError::TransientField {
                    column: entry.column_name.clone(),
                })
            } else {
                None
            }
        });
        if let Some(e) = misplaced {
            self.push_error(e);
            return;
        }
        match self.col_map.locate_column(field) {
            Ok(column) => {
                let bind = self.db.dialect().bind_var(self.assign_args.len());
                self.assign_args.push_param(value);
                self.assign_cols.push(column);
                self.assign_bind_vars.push(bind);
            }
            Err(e) => self.push_error(e),
        }
    }

    pub(crate) fn order_by(&mut self, operand: Operand, direction: &str) {
        match direction.parse() {
            Ok(direction) => self.order_by.push(Order { operand, direction }),
            Err(e) => self.push_error(e),
        }
    }

    pub(crate) fn discard_order_by(&mut self) {
        self.order_by.clear();
    }

    pub(crate) fn group_by(&mut self, field: Column) {
        match self.col_map.locate_table_and_column(field) {
            Ok(column) => self.group_by.push(column),
            Err(e) => self.push_error(e),
        }
    }

    pub(crate) fn set_limit(&mut self, limit: Option<i64>) {
        self.limit = limit;
    }

    pub(crate) fn set_offset(&mut self, offset: Option<i64>) {
        self.offset = offset;
    }

    /// Restrict the select list to `fields`.
    pub(crate) fn fields(&mut self, fields: impl IntoIterator<Item = Column>) {
        for entry in self.col_map.iter_mut() {
            entry.do_select = false;
        }
        for field in fields {
            self.add_field(field);
        }
    }

    /// Add `field` to the select list, running its join callback if it has
    /// one. The callback's join leaves the open clause unchanged.
    pub(crate) fn add_field(&mut self, field: Column) {
        let (join, parent) = match self.col_map.join_map_for(field) {
            Ok(entry) => {
                entry.do_select = true;
                if entry.select_target.is_some() {
                    return;
                }
                match &entry.join {
                    Some(join) => (join.clone(), entry.parent),
                    None => return,
                }
            }
            Err(e) => {
                self.push_error(e);
                return;
            }
        };

        match join(parent, field) {
            None => {
                if let Ok(entry) = self.col_map.join_map_for(field) {
                    entry.do_select = false;
                }
            }
            Some(spec) => {
                let active = self.active;
                self.join_table(spec.kind, spec.target.as_ref(), spec.alias.as_deref());
                for constraint in spec.constraints {
                    self.add_filter(constraint);
                }
                self.active = active;
                if let Ok(entry) = self.col_map.join_map_for(field) {
                    entry.select_target = Some(spec.selection);
                }
            }
        }
    }

    /// Select `expr` in place of `field`, aliased with the field's column.
    pub(crate) fn select_as(&mut self, field: Column, expr: Operand) {
        match self.col_map.join_map_for(field) {
            Ok(entry) => {
                entry.select_target = Some(expr);
                entry.do_select = true;
            }
            Err(e) => self.push_error(e),
        }
    }

    pub(crate) fn distinct_on(&mut self, operands: Vec<Operand>) {
        self.distinct_on = operands;
    }

    pub(crate) fn for_update(&mut self, of: Option<&dyn MapTarget>) {
        let of = match of {
            None => None,
            Some(target) => match self.col_map.quoted_table_of(target.instance()) {
                Some(table) => Some(table.to_string()),
                None => {
                    self.push_error(PlanError::TableNotMapped {
                        type_name: target.model_name(),
                    });
                    None
                }
            },
        };
        self.for_update = Some(ForUpdate { of });
    }

    pub(crate) fn require_extension(&mut self, extension: ExtensionKind) {
        if !self.db.extension_enabled(extension) {
            let dialect = self.db.dialect().name();
            self.push_error(PlanError::ExtensionNotFound {
                extension: extension.name(),
                dialect,
            });
        }
    }
}
