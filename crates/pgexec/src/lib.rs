//! # pgexec
//!
//! Immutable, parameterized SQL statements for PostgreSQL, executed against a
//! connection pool or a transaction.
//!
//! ## Features
//!
//! - **SQL explicit**: statements are plain text plus ordered parameters
//! - **Immutable builder**: every clause method returns a new [`Sql`], so a base
//!   statement can be branched without aliasing
//! - **Placeholder renumbering**: `IN (...)` lists continue the `$n` sequence
//! - **Pool or transaction**: [`Db`] and [`DbTx`] are interchangeable targets
//! - **One-number outcome**: rows affected for `update`/`delete`, the generated
//!   id for `insert`/`replace`
//! - **Opt-in SQL logging** through `tracing`, configured per [`Db`]
//!
//! ```ignore
//! use pgexec::{Db, DbConfig, sql};
//!
//! let db = Db::connect_with_config(
//!     "postgres://localhost/app",
//!     DbConfig::new().enable_sql_logging(),
//! )?;
//!
//! let removed = sql("delete from sessions")
//!     .where_in("user_id", ["17", "42"])
//!     .and_where_in("device", ["web"])
//!     .exec(&db)
//!     .await?;
//!
//! let id = sql("insert into users (name) values ($1) returning id")
//!     .bind("alice")
//!     .exec(&db)
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod exec;
pub mod log;
pub mod pool;
pub mod prelude;
pub mod sql;
pub mod transaction;

pub use client::{Executor, PgPool, PgTx, PoolExecutor, TxExecutor};
pub use config::DbConfig;
pub use db::{Db, DbTx};
pub use error::{ExecError, ExecResult};
pub use exec::{ExecTarget, Outcome, RawResult, StatementKind, interpret};
pub use log::SqlLogger;
pub use pool::{create_pool, create_pool_with_tls};
pub use sql::{PLACEHOLDER_PREFIX, Param, Sql, SqlStr, encode_batch, param, sql};
