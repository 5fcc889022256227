//! Error types for structq

use thiserror::Error;

/// Result type alias for structq operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors raised while a query plan is constructed or rendered.
///
/// These are collected on the plan and surface from the first terminal call,
/// before anything reaches the executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The model type was never registered with `DbMap::add_table`.
    #[error("Table for type {type_name} is not registered")]
    UnregisteredTable { type_name: &'static str },

    /// Every field of the struct is transient, private or skipped.
    #[error("No fields in the target struct are mappable: {type_name}")]
    NoMappableFields { type_name: &'static str },

    /// The same reference instance was mapped into one plan twice.
    #[error("Reference for {type_name} is already mapped in this query; use a fresh reference")]
    DuplicateTarget { type_name: &'static str },

    /// A field token that does not belong to any mapped reference.
    #[error("Field {field} is not mapped in this query")]
    FieldNotMapped { field: String },

    /// A transient field used as a query value without a select target.
    #[error("Cannot run queries against transient column {column}")]
    TransientField { column: String },

    /// Assignment to a field of a joined table.
    #[error("Field {field} does not belong to the query target")]
    AssignOutsideTarget { field: String },

    /// ORDER BY direction other than "", "asc" or "desc".
    #[error("Order by direction {0:?} not supported")]
    InvalidDirection(String),

    /// IN filter without any values.
    #[error("IN filter requires at least one value")]
    EmptyInList,

    /// ORDER BY expression that does not reference any field.
    #[error("Order by expression must reference at least one field")]
    OrderWithoutField,

    /// FOR UPDATE OF a reference that is not part of the query.
    #[error("Table {type_name} is not part of this query")]
    TableNotMapped { type_name: &'static str },

    /// INSERT or UPDATE without any assignment.
    #[error("Insert and update require at least one assignment")]
    NoAssignments,

    /// SELECT with an empty column list.
    #[error("Select list is empty")]
    NoSelectedColumns,

    /// No extension of the requested kind is enabled for the dialect.
    #[error("No {extension} extension enabled for dialect {dialect}")]
    ExtensionNotFound {
        extension: &'static str,
        dialect: &'static str,
    },
}

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Query construction or rendering error
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// The plan error behind this error, if any.
    pub fn as_plan_error(&self) -> Option<&PlanError> {
        match self {
            Self::Plan(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Parse a tokio_postgres error into a more specific OrmError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
