use super::{Param, Sql};
use crate::error::ExecResult;
use crate::exec::ExecTarget;
use std::any::Any;
use std::fmt;

/// A bare SQL text with no parameters attached yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SqlStr(String);

impl SqlStr {
    /// Wrap the given text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The text, exactly as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Promote to a [`Sql`] with the given parameters (possibly none).
    ///
    /// # Example
    /// ```ignore
    /// use pgexec::{SqlStr, param};
    ///
    /// let q = SqlStr::from("update users set status = $1 where id = $2")
    ///     .add_params([param("inactive"), param(42_i64)]);
    /// ```
    pub fn add_params(&self, params: impl IntoIterator<Item = Param>) -> Sql {
        Sql::from_parts(self.0.clone(), params)
    }

    /// Execute the text as-is, with no parameters.
    pub async fn exec<'a>(&self, target: impl Into<ExecTarget<'a>>) -> ExecResult<i64> {
        target.into().exec(&self.0, &[], None).await
    }

    /// Execute the text as-is against a type-erased [`Db`](crate::Db) or
    /// [`DbTx`](crate::DbTx).
    pub async fn exec_any(&self, source: &(dyn Any + Send + Sync)) -> ExecResult<i64> {
        let target = ExecTarget::from_any(source)?;
        self.exec(target).await
    }
}

impl From<&str> for SqlStr {
    fn from(sql: &str) -> Self {
        Self(sql.to_string())
    }
}

impl From<String> for SqlStr {
    fn from(sql: String) -> Self {
        Self(sql)
    }
}

impl From<SqlStr> for Sql {
    fn from(s: SqlStr) -> Self {
        Sql::new(s.0)
    }
}

impl fmt::Display for SqlStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
