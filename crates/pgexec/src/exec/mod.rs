//! Statement execution: routing to a pool or transaction and deciding what
//! the returned number means.
//!
//! ```ignore
//! use pgexec::{Db, sql};
//!
//! let db = Db::connect("postgres://localhost/app")?;
//! let changed = sql("update users set active = false")
//!     .where_in("id", ["3", "4"])
//!     .exec(&db)
//!     .await?;
//! ```

mod kind;
mod result;
mod target;

#[cfg(test)]
mod tests;

pub use kind::{Outcome, StatementKind, interpret};
pub use result::RawResult;
pub use target::ExecTarget;
