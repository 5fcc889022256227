//! The execution seam between plans and a database connection.

use crate::client::GenericClient;
use crate::error::{OrmError, OrmResult};
use crate::row::FromRow;
use tokio_postgres::types::ToSql;

/// Runs rendered statements.
///
/// Every [`GenericClient`] is an executor. Other implementations (a
/// recording double in tests, another driver) only need these three calls.
pub trait Executor: Send + Sync {
    /// Run a statement that returns no rows; yields the affected row count.
    fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Run a query and decode every row.
    fn select<T>(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send
    where
        T: FromRow + Send;

    /// Run a query returning a single integer (COUNT).
    fn select_int(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<i64>> + Send;
}

impl<C: GenericClient> Executor for C {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        GenericClient::execute(self, sql, params).await
    }

    async fn select<T>(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<T>>
    where
        T: FromRow + Send,
    {
        let rows = GenericClient::query(self, sql, params).await?;
        rows.iter().map(T::from_row).collect()
    }

    async fn select_int(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<i64> {
        let row = GenericClient::query_one(self, sql, params).await?;
        row.try_get::<_, i64>(0)
            .map_err(|e| OrmError::decode("count", e.to_string()))
    }
}
