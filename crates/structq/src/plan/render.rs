//! Statement rendering.
//!
//! Every clause is rendered in textual order into one argument list, so
//! placeholder `n` always refers to argument `n`.

use super::{QueryPlan, Statement};
use crate::error::PlanError;
use crate::filter::{Filter, Operand};
use crate::mapping::Column;
use crate::param::{Param, ParamList};

impl<'a, E, M> QueryPlan<'a, E, M> {
    fn first_error(&self) -> Result<(), PlanError> {
        match self.errors.first() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Assignment arguments lead, then the FROM sub-query's arguments.
    fn reset_args(&self) -> ParamList {
        let mut args = ParamList::new();
        args.extend(&self.assign_args);
        args.extend(&self.sub_args);
        args
    }

    /// Resolve an operand to SQL: a bind variable (recording the argument),
    /// a qualified column or the field's select target, or a wrapped
    /// expression.
    pub(crate) fn arg_or_column(
        &self,
        operand: &Operand,
        args: &mut ParamList,
    ) -> Result<String, PlanError> {
        self.resolve(operand, args, &mut Vec::new())
    }

    /// `expanding` holds the fields whose select targets are being rendered.
    /// A field met again inside its own target is the stored column.
    fn resolve(
        &self,
        operand: &Operand,
        args: &mut ParamList,
        expanding: &mut Vec<Column>,
    ) -> Result<String, PlanError> {
        match operand {
            Operand::Column(field) => {
                if expanding.contains(field) {
                    return self.stored_column(*field);
                }
                let entry = self.col_map.field_map_for(*field)?;
                match &entry.select_target {
                    Some(target) => {
                        expanding.push(*field);
                        let sql = self.resolve(target, args, expanding);
                        expanding.pop();
                        sql
                    }
                    None => Ok(entry.qualified()),
                }
            }
            Operand::Value(param) => {
                let bind = self.db.dialect().bind_var(args.len());
                args.push_param(param.clone());
                Ok(bind)
            }
            Operand::Wrapped(wrapper) => {
                let values = wrapper
                    .actual_values()
                    .into_iter()
                    .map(|operand| self.resolve(operand, args, expanding))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(wrapper.wrap_sql(&values))
            }
        }
    }

    /// The column a field is stored in. Transient fields have none.
    fn stored_column(&self, field: Column) -> Result<String, PlanError> {
        let entry = self.col_map.get(field).ok_or_else(|| PlanError::FieldNotMapped {
            field: field.to_string(),
        })?;
        if entry.transient {
            return Err(PlanError::TransientField {
                column: entry.column_name.clone(),
            });
        }
        Ok(entry.qualified())
    }

    fn resolve_all(
        &self,
        operands: Vec<&Operand>,
        args: &mut ParamList,
    ) -> Result<Vec<String>, PlanError> {
        operands
            .into_iter()
            .map(|operand| self.arg_or_column(operand, args))
            .collect()
    }

    fn filter_sql(&self, filter: &Filter, args: &mut ParamList) -> Result<String, PlanError> {
        let values = self.resolve_all(filter.actual_values(), args)?;
        Ok(filter.where_sql(&values))
    }

    fn write_joins(&self, sql: &mut String, args: &mut ParamList) -> Result<(), PlanError> {
        for join in &self.joins {
            let values = self.resolve_all(join.actual_values(), args)?;
            sql.push(' ');
            sql.push_str(&join.join_clause(&values));
        }
        Ok(())
    }

    fn write_where(&self, sql: &mut String, args: &mut ParamList) -> Result<(), PlanError> {
        let condition = self.filter_sql(&self.where_filter, args)?;
        if !condition.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        Ok(())
    }

    /// `<keyword> t1, t2 AS a` for UPDATE ... FROM and DELETE ... USING.
    fn write_join_tables(&self, sql: &mut String, keyword: &str) {
        if self.joins.is_empty() {
            return;
        }
        let tables: Vec<String> = self.joins.iter().map(|j| j.from_item()).collect();
        sql.push_str(keyword);
        sql.push_str(&tables.join(", "));
    }

    /// WHERE conditions followed by the joins' ON conditions.
    fn write_mutation_where(&self, sql: &mut String, args: &mut ParamList) -> Result<(), PlanError> {
        let mut conditions = Vec::new();
        let condition = self.filter_sql(&self.where_filter, args)?;
        if !condition.is_empty() {
            conditions.push(condition);
        }
        for join in &self.joins {
            let values = self.resolve_all(join.actual_values(), args)?;
            let condition = join.where_sql(&values);
            if !condition.is_empty() {
                conditions.push(condition);
            }
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        Ok(())
    }

    /// Non-positive limits and offsets count as unset.
    fn write_limit_offset(&self, sql: &mut String, args: &mut ParamList) {
        let dialect = self.db.dialect();
        let mut fetch = None;
        if let Some(limit) = self.limit.filter(|&n| n > 0) {
            let bind = dialect.bind_var(args.len());
            match dialect.limit(&bind) {
                Some(clause) => {
                    args.push_param(Param::new(limit));
                    sql.push(' ');
                    sql.push_str(&clause);
                }
                None => fetch = Some(limit),
            }
        }
        if let Some(offset) = self.offset.filter(|&n| n > 0) {
            let bind = dialect.bind_var(args.len());
            args.push_param(Param::new(offset));
            sql.push_str(" OFFSET ");
            sql.push_str(&bind);
        }
        if let Some(limit) = fetch {
            let bind = dialect.bind_var(args.len());
            args.push_param(Param::new(limit));
            sql.push_str(&format!(" FETCH NEXT ({}) ROWS ONLY", bind));
        }
    }

    pub fn select_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        let mut args = self.reset_args();
        let mut sql = String::from("SELECT ");

        if !self.distinct_on.is_empty() {
            let distinct: Vec<&Operand> = self.distinct_on.iter().collect();
            let columns = self.resolve_all(distinct, &mut args)?;
            sql.push_str("DISTINCT ON (");
            sql.push_str(&columns.join(", "));
            sql.push_str(") ");
        }

        let mut columns = Vec::new();
        for entry in self.col_map.iter().filter(|e| e.do_select) {
            match &entry.select_target {
                Some(target) => {
                    let expr = self.resolve(target, &mut args, &mut vec![entry.field])?;
                    columns.push(format!("{} AS {}", expr, entry.quoted_column));
                }
                None => columns.push(entry.qualified()),
            }
        }
        if columns.is_empty() {
            return Err(PlanError::NoSelectedColumns);
        }
        sql.push_str(&columns.join(", "));

        sql.push_str(" FROM ");
        sql.push_str(&self.from_clause);
        self.write_joins(&mut sql, &mut args)?;
        self.write_where(&mut sql, &mut args)?;

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            let mut parts = Vec::with_capacity(self.order_by.len());
            for order in &self.order_by {
                if !order.operand.references_column() {
                    return Err(PlanError::OrderWithoutField);
                }
                let expr = self.arg_or_column(&order.operand, &mut args)?;
                parts.push(format!("{}{}", expr, order.direction.suffix()));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        self.write_limit_offset(&mut sql, &mut args);

        if let Some(for_update) = &self.for_update {
            sql.push_str(" FOR UPDATE");
            if let Some(of) = &for_update.of {
                sql.push_str(" OF ");
                sql.push_str(of);
            }
        }

        Ok(Statement { sql, args })
    }

    /// `SELECT COUNT(*)` over the same FROM, JOIN and WHERE clauses.
    pub fn count_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        let mut args = self.reset_args();
        let mut sql = String::from("SELECT COUNT(*) FROM ");
        sql.push_str(&self.from_clause);
        self.write_joins(&mut sql, &mut args)?;
        self.write_where(&mut sql, &mut args)?;
        Ok(Statement { sql, args })
    }

    pub fn insert_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        if self.assign_cols.is_empty() {
            return Err(PlanError::NoAssignments);
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quoted_table,
            self.assign_cols.join(", "),
            self.assign_bind_vars.join(", ")
        );
        Ok(Statement {
            sql,
            args: self.reset_args(),
        })
    }

    /// `UPDATE t SET ... [FROM joined] [WHERE ...]`; join conditions are
    /// appended to the WHERE clause.
    pub fn update_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        if self.assign_cols.is_empty() {
            return Err(PlanError::NoAssignments);
        }
        let mut args = self.reset_args();
        let assignments: Vec<String> = self
            .assign_cols
            .iter()
            .zip(&self.assign_bind_vars)
            .map(|(column, bind)| format!("{} = {}", column, bind))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.quoted_table, assignments.join(", "));
        self.write_join_tables(&mut sql, " FROM ");
        self.write_mutation_where(&mut sql, &mut args)?;
        Ok(Statement { sql, args })
    }

    /// `DELETE FROM t [USING joined] [WHERE ...]`.
    pub fn delete_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        let mut args = self.reset_args();
        let mut sql = format!("DELETE FROM {}", self.quoted_table);
        self.write_join_tables(&mut sql, " USING ");
        self.write_mutation_where(&mut sql, &mut args)?;
        Ok(Statement { sql, args })
    }

    pub fn truncate_statement(&self) -> Result<Statement, PlanError> {
        self.first_error()?;
        Ok(Statement {
            sql: format!("TRUNCATE TABLE {}", self.quoted_table),
            args: ParamList::new(),
        })
    }
}
