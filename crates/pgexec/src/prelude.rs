//! Convenient imports for typical `pgexec` usage.
//!
//! ```ignore
//! use pgexec::prelude::*;
//! ```

pub use crate::{Db, DbConfig, DbTx, ExecError, ExecResult, Sql, SqlStr, param, sql};
