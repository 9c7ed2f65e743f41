//! Execution capabilities behind [`Db`](crate::Db) and [`DbTx`](crate::DbTx).
//!
//! [`PgPool`] and [`PgTx`] are the PostgreSQL implementations. Other
//! implementations (test doubles, proxies) plug in through
//! [`Db::from_executor`](crate::Db::from_executor) and
//! [`DbTx::from_executor`](crate::DbTx::from_executor).

use crate::error::{ExecError, ExecResult};
use crate::exec::RawResult;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use std::pin::pin;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Runs one statement and reports the driver result.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ExecResult<RawResult>;
}

/// A pool of connections that can also open transactions.
#[async_trait]
pub trait PoolExecutor: Executor {
    async fn begin(&self) -> ExecResult<Box<dyn TxExecutor>>;
}

/// An open transaction.
#[async_trait]
pub trait TxExecutor: Executor {
    async fn commit(self: Box<Self>) -> ExecResult<()>;
    async fn rollback(self: Box<Self>) -> ExecResult<()>;
}

/// Run `sql` through `query_raw` and drain the row stream.
///
/// The first column of the last returned row (from `RETURNING`) is kept as
/// the generated identifier when it is an `int8` or `int4`.
async fn run_raw(
    client: &tokio_postgres::Client,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> ExecResult<RawResult> {
    let stream = client.query_raw(sql, params.iter().copied()).await?;
    let mut stream = pin!(stream);

    let mut returned_id = None;
    while let Some(row) = stream.try_next().await? {
        returned_id = returned_id_of(&row);
    }
    let rows_affected = stream.rows_affected().unwrap_or(0);
    Ok(RawResult::new(rows_affected, returned_id))
}

fn returned_id_of(row: &Row) -> Option<i64> {
    if row.is_empty() {
        return None;
    }
    row.try_get::<_, i64>(0)
        .ok()
        .or_else(|| row.try_get::<_, i32>(0).ok().map(i64::from))
}

// ===== deadpool-postgres support =====

/// A `deadpool-postgres` pool.
#[derive(Clone)]
pub struct PgPool(deadpool_postgres::Pool);

impl PgPool {
    pub fn new(pool: deadpool_postgres::Pool) -> Self {
        Self(pool)
    }
}

#[async_trait]
impl Executor for PgPool {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ExecResult<RawResult> {
        let client = self.0.get().await?;
        run_raw(&client, sql, params).await
    }
}

#[async_trait]
impl PoolExecutor for PgPool {
    async fn begin(&self) -> ExecResult<Box<dyn TxExecutor>> {
        let client = self.0.get().await?;
        client.batch_execute("BEGIN").await?;
        Ok(Box::new(PgTx {
            client: Some(client),
        }))
    }
}

/// A transaction holding one pooled connection between `BEGIN` and
/// `COMMIT`/`ROLLBACK`.
///
/// If dropped while still open, the connection is detached from the pool and
/// closed, which makes the server roll the transaction back.
pub struct PgTx {
    client: Option<deadpool_postgres::Object>,
}

impl PgTx {
    fn client(&self) -> ExecResult<&deadpool_postgres::Object> {
        self.client.as_ref().ok_or(ExecError::UninitializedTarget)
    }

    async fn finish(mut self: Box<Self>, command: &str) -> ExecResult<()> {
        let client = self.client.take().ok_or(ExecError::UninitializedTarget)?;
        client.batch_execute(command).await?;
        Ok(())
    }
}

#[async_trait]
impl Executor for PgTx {
    async fn exec(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ExecResult<RawResult> {
        run_raw(self.client()?, sql, params).await
    }
}

#[async_trait]
impl TxExecutor for PgTx {
    async fn commit(self: Box<Self>) -> ExecResult<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> ExecResult<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PgTx {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            tracing::warn!(
                target: "pgexec.sql",
                "transaction dropped without commit or rollback; closing its connection"
            );
            drop(deadpool_postgres::Object::take(client));
        }
    }
}
