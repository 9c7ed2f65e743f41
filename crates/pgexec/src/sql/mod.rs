//! Immutable parameterized SQL statements.
//!
//! [`Sql`] pairs a SQL text with its ordered parameters. Every clause method
//! borrows the receiver and returns a new statement, so a base statement can
//! be branched freely:
//!
//! ```ignore
//! use pgexec::sql;
//!
//! let base = sql("select * from users");
//! let by_id = base.where_in("id", ["1", "2", "3"]).limit(10);
//! let newest = base.order_by("created_at desc").limit(5);
//!
//! // select * from users where id in ($1,$2,$3)  limit 10
//! println!("{}", by_id.sql());
//! ```
//!
//! Placeholders generated by [`Sql::where_in`] and [`Sql::and_where_in`] are
//! numbered after the parameters the statement already holds.

mod batch;
mod builder;
mod fragment;


use std::sync::Arc;
use tokio_postgres::types::ToSql;

pub use batch::{PLACEHOLDER_PREFIX, encode_batch};
pub use builder::Sql;
pub use fragment::SqlStr;

/// A bound parameter value.
pub type Param = Arc<dyn ToSql + Sync + Send>;

/// Start building a SQL statement with no parameters.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Wrap a value as a [`Param`] for [`SqlStr::add_params`] / [`Sql::from_parts`].
pub fn param<T>(value: T) -> Param
where
    T: ToSql + Sync + Send + 'static,
{
    Arc::new(value)
}
