use super::interpret;
use crate::client::Executor;
use crate::config::DbConfig;
use crate::db::{Db, DbTx};
use crate::error::{ExecError, ExecResult};
use std::any::Any;
use tokio_postgres::types::ToSql;

/// Where a statement runs: a connection pool or an open transaction.
#[derive(Clone, Copy)]
pub enum ExecTarget<'a> {
    Pool(&'a Db),
    Tx(&'a DbTx),
}

impl<'a> ExecTarget<'a> {
    /// Resolve a type-erased source.
    ///
    /// Returns [`ExecError::UnsupportedTarget`] unless `source` is a [`Db`] or a [`DbTx`].
    pub fn from_any(source: &'a (dyn Any + Send + Sync)) -> ExecResult<Self> {
        if let Some(db) = source.downcast_ref::<Db>() {
            return Ok(ExecTarget::Pool(db));
        }
        if let Some(tx) = source.downcast_ref::<DbTx>() {
            return Ok(ExecTarget::Tx(tx));
        }
        Err(ExecError::UnsupportedTarget)
    }

    fn label(self) -> &'static str {
        match self {
            ExecTarget::Pool(_) => "pool",
            ExecTarget::Tx(_) => "tx",
        }
    }

    fn config(self) -> &'a DbConfig {
        match self {
            ExecTarget::Pool(db) => db.config(),
            ExecTarget::Tx(tx) => tx.config(),
        }
    }

    fn executor(self) -> Option<&'a dyn Executor> {
        match self {
            ExecTarget::Pool(db) => db.executor().map(|p| p as &dyn Executor),
            ExecTarget::Tx(tx) => tx.executor().map(|t| t as &dyn Executor),
        }
    }

    /// Run `sql` with `params` and interpret the result.
    ///
    /// Blank handles fail with [`ExecError::UninitializedTarget`] before anything
    /// is logged or sent. Driver errors are returned unchanged.
    pub async fn exec(
        self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        tag: Option<&str>,
    ) -> ExecResult<i64> {
        let executor = self.executor().ok_or(ExecError::UninitializedTarget)?;

        let config = self.config();
        if config.sql_logging {
            config.sql_log.emit(self.label(), tag, sql, params);
        }

        let result = executor.exec(sql, params).await?;
        interpret(sql, &result)
    }
}

impl<'a> From<&'a Db> for ExecTarget<'a> {
    fn from(db: &'a Db) -> Self {
        ExecTarget::Pool(db)
    }
}

impl<'a> From<&'a DbTx> for ExecTarget<'a> {
    fn from(tx: &'a DbTx) -> Self {
        ExecTarget::Tx(tx)
    }
}
