//! Error types for pgexec

use thiserror::Error;

/// Result type alias for pgexec operations
pub type ExecResult<T> = Result<T, ExecError>;

/// Error types for statement execution
#[derive(Debug, Error)]
pub enum ExecError {
    /// Execution attempted against a blank [`Db`](crate::Db) or [`DbTx`](crate::DbTx)
    #[error("cannot execute: the database handle is not initialized")]
    UninitializedTarget,

    /// The execution source is neither a pool nor a transaction
    #[error("unsupported execution target: only Db and DbTx are supported")]
    UnsupportedTarget,

    /// The statement's leading verb is not update/delete/insert/replace
    #[error("unsupported statement kind '{0}': only update, delete, insert and replace are supported")]
    UnsupportedStatementKind(String),

    /// The driver rejected or failed the statement
    #[error("Driver error: {0}")]
    Driver(#[from] tokio_postgres::Error),

    /// No identifier was returned by the statement (missing `RETURNING`)
    #[error("no generated identifier was returned (add a RETURNING clause)")]
    NoGeneratedId,

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ExecError {
    /// Create an unsupported statement kind error from the offending SQL.
    ///
    /// Only the leading token is kept so large statements don't end up in the message.
    pub fn unsupported_kind(sql: &str) -> Self {
        let verb = sql.split_whitespace().next().unwrap_or_default();
        Self::UnsupportedStatementKind(verb.to_string())
    }

    /// Check if this is an uninitialized target error
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::UninitializedTarget)
    }

    /// Check if this error came from the driver
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}

impl From<deadpool_postgres::PoolError> for ExecError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
