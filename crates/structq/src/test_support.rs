//! Hand-written models and a recording executor for unit tests.

use crate::db_map::DbMap;
use crate::dialect::DialectKind;
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::mapping::{Column, FieldCursor, FieldDef, Fields, InstanceId, Reference, Table};
use crate::row::{FromRow, RowExt};
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub memo: String,
    pub person_id: i64,
    pub is_paid: bool,
    pub person_name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceRef {
    instance: InstanceId,
    pub id: Column,
    pub memo: Column,
    pub person_id: Column,
    pub is_paid: Column,
    pub person_name: Column,
}

impl Fields for Invoice {
    type Ref = InvoiceRef;

    fn field_defs(out: &mut Vec<FieldDef>) {
        out.extend([
            FieldDef::new("id", "id"),
            FieldDef::new("memo", "memo"),
            FieldDef::new("person_id", "person_id"),
            FieldDef::new("is_paid", "is_paid"),
            FieldDef::transient("person_name", "person_name"),
        ]);
    }

    fn build_ref(cursor: &mut FieldCursor) -> InvoiceRef {
        InvoiceRef {
            instance: cursor.instance(),
            id: cursor.next_column(),
            memo: cursor.next_column(),
            person_id: cursor.next_column(),
            is_paid: cursor.next_column(),
            person_name: cursor.next_column(),
        }
    }
}

impl Table for Invoice {
    const TABLE: &'static str = "invoices";
}

impl Reference for InvoiceRef {
    type Model = Invoice;

    fn instance(&self) -> InstanceId {
        self.instance
    }
}

impl FromRow for Invoice {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get_column_or_default("id")?,
            memo: row.try_get_column_or_default("memo")?,
            person_id: row.try_get_column_or_default("person_id")?,
            is_paid: row.try_get_column_or_default("is_paid")?,
            person_name: row.try_get_column_or_default("person_name")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PersonRef {
    instance: InstanceId,
    pub id: Column,
    pub name: Column,
}

impl Fields for Person {
    type Ref = PersonRef;

    fn field_defs(out: &mut Vec<FieldDef>) {
        out.push(FieldDef::new("id", "id"));
        out.push(FieldDef::new("name", "name"));
    }

    fn build_ref(cursor: &mut FieldCursor) -> PersonRef {
        PersonRef {
            instance: cursor.instance(),
            id: cursor.next_column(),
            name: cursor.next_column(),
        }
    }
}

impl Table for Person {
    const TABLE: &'static str = "people";
}

impl Reference for PersonRef {
    type Model = Person;

    fn instance(&self) -> InstanceId {
        self.instance
    }
}

impl FromRow for Person {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get_column_or_default("id")?,
            name: row.try_get_column_or_default("name")?,
        })
    }
}

/// A table whose only field is transient.
#[derive(Debug, Clone, Default)]
pub struct Empty {
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct EmptyRef {
    instance: InstanceId,
    pub note: Column,
}

impl Fields for Empty {
    type Ref = EmptyRef;

    fn field_defs(out: &mut Vec<FieldDef>) {
        out.push(FieldDef::transient("note", "note"));
    }

    fn build_ref(cursor: &mut FieldCursor) -> EmptyRef {
        EmptyRef {
            instance: cursor.instance(),
            note: cursor.next_column(),
        }
    }
}

impl Table for Empty {
    const TABLE: &'static str = "empty";
}

impl Reference for EmptyRef {
    type Model = Empty;

    fn instance(&self) -> InstanceId {
        self.instance
    }
}

/// A `DbMap` with `Invoice` and `Person` registered.
pub fn db(dialect: DialectKind) -> DbMap {
    let mut db = DbMap::new(dialect);
    db.add_table::<Invoice>();
    db.add_table::<Person>();
    db
}

/// Records every statement instead of running it.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, usize)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(sql, argument count)` of every call so far.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.len()));
    }
}

impl Executor for RecordingExecutor {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        self.record(sql, params);
        Ok(1)
    }

    async fn select<T>(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<T>>
    where
        T: FromRow + Send,
    {
        self.record(sql, params);
        Ok(Vec::new())
    }

    async fn select_int(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<i64> {
        self.record(sql, params);
        Ok(0)
    }
}
