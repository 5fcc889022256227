//! Registered table metadata.

use super::{FieldDef, Table};

/// Column metadata of a registered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    field_name: &'static str,
    column_name: String,
    transient: bool,
}

impl ColumnMap {
    fn from_def(def: &FieldDef) -> Self {
        Self {
            field_name: def.field,
            column_name: def.column.to_string(),
            transient: def.transient,
        }
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

    /// Map the field to a different column name.
    pub fn rename(&mut self, column: impl Into<String>) -> &mut Self {
        self.column_name = column.into();
        self
    }

    /// Transient columns are never selected or written.
    pub fn set_transient(&mut self, transient: bool) -> &mut Self {
        self.transient = transient;
        self
    }
}

/// Table-level mapping for one model type.
///
/// Columns are kept in field order; position `n` corresponds to token index
/// `n` of every reference built for the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMap {
    schema: Option<String>,
    name: String,
    columns: Vec<ColumnMap>,
}

impl TableMap {
    pub fn for_table<T: Table>() -> Self {
        Self {
            schema: T::SCHEMA.map(str::to_string),
            name: T::TABLE.to_string(),
            columns: T::columns().iter().map(ColumnMap::from_def).collect(),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnMap] {
        &self.columns
    }

    pub fn set_schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Column metadata for a field, by Rust field name.
    pub fn column_mut(&mut self, field: &str) -> Option<&mut ColumnMap> {
        self.columns.iter_mut().find(|c| c.field_name == field)
    }

    /// Number of columns that can be selected and written.
    pub fn queryable_count(&self) -> usize {
        self.columns.iter().filter(|c| !c.transient).count()
    }
}
