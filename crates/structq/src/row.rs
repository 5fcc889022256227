//! Row mapping traits and utilities

use crate::error::{OrmError, OrmResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRow)]`
/// from the `structq-derive` crate.
///
/// # Example
///
/// ```ignore
/// use structq::FromRow;
///
/// #[derive(FromRow)]
/// struct Invoice {
///     pub id: i64,
///     pub memo: String,
///     #[orm(transient)]
///     pub person_name: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning OrmError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;

    /// Get a column value when the row has that column, `T::default()` otherwise.
    ///
    /// Derived `FromRow` impls decode every mapped column this way, since a
    /// query may select only some fields and transient fields appear only
    /// when computed.
    fn try_get_column_or_default<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a> + Default;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }

    fn try_get_column_or_default<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a> + Default,
    {
        if self.columns().iter().any(|c| c.name() == column) {
            self.try_get_column(column)
        } else {
            Ok(T::default())
        }
    }
}
