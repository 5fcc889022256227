//! Terminal operations that run a rendered statement.
//!
//! Recorded construction errors and rendering errors are returned before the
//! executor is called.

use super::{QueryPlan, Statement, StatementKind};
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::row::FromRow;

impl<'a, E, M> QueryPlan<'a, E, M>
where
    E: Executor,
{
    fn log(&self, kind: StatementKind, statement: &Statement) {
        self.db.config().log.emit(kind, statement);
    }

    pub async fn select(&self) -> OrmResult<Vec<M>>
    where
        M: FromRow + Send,
    {
        let statement = self.select_statement()?;
        self.log(StatementKind::Select, &statement);
        self.executor
            .select::<M>(statement.sql(), &statement.params_ref())
            .await
    }

    /// Run the SELECT and decode rows into `T` instead of the target type,
    /// appending to `target`.
    pub async fn select_to_target<T>(&self, target: &mut Vec<T>) -> OrmResult<()>
    where
        T: FromRow + Send,
    {
        let statement = self.select_statement()?;
        self.log(StatementKind::Select, &statement);
        let rows = self
            .executor
            .select::<T>(statement.sql(), &statement.params_ref())
            .await?;
        target.extend(rows);
        Ok(())
    }

    pub async fn count(&self) -> OrmResult<i64> {
        let statement = self.count_statement()?;
        self.log(StatementKind::Count, &statement);
        self.executor
            .select_int(statement.sql(), &statement.params_ref())
            .await
    }

    pub async fn insert(&self) -> OrmResult<u64> {
        let statement = self.insert_statement()?;
        self.run(StatementKind::Insert, statement).await
    }

    pub async fn update(&self) -> OrmResult<u64> {
        let statement = self.update_statement()?;
        self.run(StatementKind::Update, statement).await
    }

    pub async fn delete(&self) -> OrmResult<u64> {
        let statement = self.delete_statement()?;
        self.run(StatementKind::Delete, statement).await
    }

    pub async fn truncate(&self) -> OrmResult<u64> {
        let statement = self.truncate_statement()?;
        self.run(StatementKind::Truncate, statement).await
    }

    async fn run(&self, kind: StatementKind, statement: Statement) -> OrmResult<u64> {
        self.log(kind, &statement);
        self.executor
            .exec(statement.sql(), &statement.params_ref())
            .await
    }
}
