//! Per-plan field-to-column map.

use super::{Column, InstanceId};
use crate::error::PlanError;
use crate::filter::Operand;
use crate::plan::JoinFn;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Resolves field tokens to quoted column references.
pub trait TableAndColumnLocator {
    /// Bare quoted column, as used in SET and INSERT column lists.
    fn locate_column(&self, field: Column) -> Result<String, PlanError>;

    /// `table.column` (or `alias.column` for aliased joins).
    fn locate_table_and_column(&self, field: Column) -> Result<String, PlanError>;
}

/// One mapped field of a plan.
#[derive(Clone)]
pub struct FieldColumnMap {
    pub(crate) parent: InstanceId,
    pub(crate) field: Column,
    pub(crate) field_name: &'static str,
    pub(crate) column_name: String,
    pub(crate) transient: bool,
    pub(crate) quoted_table: String,
    pub(crate) quoted_column: String,
    pub(crate) select_target: Option<Operand>,
    pub(crate) do_select: bool,
    pub(crate) join: Option<JoinFn>,
}

impl FieldColumnMap {
    pub fn field(&self) -> Column {
        self.field
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn is_selected(&self) -> bool {
        self.do_select
    }

    pub fn quoted_table(&self) -> &str {
        &self.quoted_table
    }

    pub fn quoted_column(&self) -> &str {
        &self.quoted_column
    }

    /// Expression selected in place of the column, if any.
    pub fn select_target(&self) -> Option<&Operand> {
        self.select_target.as_ref()
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.quoted_table, self.quoted_column)
    }
}

impl fmt::Debug for FieldColumnMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldColumnMap")
            .field("field", &self.field)
            .field("field_name", &self.field_name)
            .field("column", &self.qualified())
            .field("transient", &self.transient)
            .field("select_target", &self.select_target)
            .field("do_select", &self.do_select)
            .field("has_join", &self.join.is_some())
            .finish()
    }
}

/// All fields mapped into one plan, in mapping order.
#[derive(Debug, Clone, Default)]
pub struct StructColumnMap {
    entries: Vec<FieldColumnMap>,
    index: HashMap<Column, usize>,
    instances: HashSet<InstanceId>,
}

impl StructColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_instance(&self, instance: InstanceId) -> bool {
        self.instances.contains(&instance)
    }

    pub(crate) fn push(&mut self, entry: FieldColumnMap) {
        self.instances.insert(entry.parent);
        self.index.insert(entry.field, self.entries.len());
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldColumnMap> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut FieldColumnMap> {
        self.entries.iter_mut()
    }

    /// Any entry for `field`, transient or not.
    pub fn get(&self, field: Column) -> Option<&FieldColumnMap> {
        self.index.get(&field).map(|&i| &self.entries[i])
    }

    /// Entry for `field`, without the transient check. Used to change what a
    /// field selects.
    pub(crate) fn join_map_for(&mut self, field: Column) -> Result<&mut FieldColumnMap, PlanError> {
        match self.index.get(&field) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(PlanError::FieldNotMapped {
                field: field.to_string(),
            }),
        }
    }

    /// Entry for `field` as a query value.
    ///
    /// Transient fields are only usable once something else (a join callback
    /// or a computed expression) supplies their value.
    pub fn field_map_for(&self, field: Column) -> Result<&FieldColumnMap, PlanError> {
        let entry = self.get(field).ok_or_else(|| PlanError::FieldNotMapped {
            field: field.to_string(),
        })?;
        if entry.transient && entry.select_target.is_none() {
            return Err(PlanError::TransientField {
                column: entry.column_name.clone(),
            });
        }
        Ok(entry)
    }

    /// Quoted table (or alias) of any field of `instance`.
    pub fn quoted_table_of(&self, instance: InstanceId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.parent == instance)
            .map(|e| e.quoted_table.as_str())
    }
}

impl TableAndColumnLocator for StructColumnMap {
    fn locate_column(&self, field: Column) -> Result<String, PlanError> {
        Ok(self.field_map_for(field)?.quoted_column.clone())
    }

    fn locate_table_and_column(&self, field: Column) -> Result<String, PlanError> {
        Ok(self.field_map_for(field)?.qualified())
    }
}
