use crate::param::ParamList;
use tokio_postgres::types::ToSql;

/// Which terminal produced a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
    Truncate,
}

/// A rendered statement: SQL text plus its bind arguments in placeholder
/// order.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub(crate) sql: String,
    pub(crate) args: ParamList,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &ParamList {
        &self.args
    }

    /// Arguments as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.as_refs()
    }

    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.args)
    }
}
