use super::Param;
use super::batch::encode_batch;
use crate::error::ExecResult;
use crate::exec::ExecTarget;
use std::any::Any;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A SQL text paired with its ordered parameters.
///
/// `Sql` is an immutable value: clause methods take `&self` and return a new
/// statement whose parameter list is a fresh copy of the receiver's.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Sql {
    sql: String,
    params: Vec<Param>,
    tag: Option<String>,
}

impl Sql {
    /// Create a statement with no parameters.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            sql: initial_sql.into(),
            params: Vec::new(),
            tag: None,
        }
    }

    /// Create a statement from a text and an already-built parameter list.
    pub fn from_parts(sql: impl Into<String>, params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_iter().collect(),
            tag: None,
        }
    }

    /// Access the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Access the bound parameters, in placeholder order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    /// The logging tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Return a copy carrying a tag for log output.
    ///
    /// # Example
    /// ```ignore
    /// let n = pgexec::sql("delete from sessions where expires_at < now()")
    ///     .tagged("sessions.expire")
    ///     .exec(&db)
    ///     .await?;
    /// ```
    pub fn tagged(&self, tag: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.tag = Some(tag.into());
        out
    }

    /// Bind one more parameter (consuming).
    ///
    /// The text is not touched; it must already contain the matching `$n`.
    pub fn bind<T>(mut self, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(Arc::new(value));
        self
    }

    /// Concatenate two statements.
    ///
    /// The text is `self` followed by `other`; the parameters are `self`'s
    /// followed by `other`'s. Neither input is modified. `other` is appended
    /// verbatim: placeholders inside it are not renumbered.
    pub fn concat(&self, other: &Sql) -> Self {
        let mut sql = String::with_capacity(self.sql.len() + other.sql.len());
        sql.push_str(&self.sql);
        sql.push_str(&other.sql);

        let mut params = Vec::with_capacity(self.params.len() + other.params.len());
        params.extend(self.params.iter().cloned());
        params.extend(other.params.iter().cloned());

        Self {
            sql,
            params,
            tag: self.tag.clone().or_else(|| other.tag.clone()),
        }
    }

    /// Append ` where <key> in ($n,...) `, numbering after the existing parameters.
    ///
    /// No check is made for an existing `WHERE`; use [`Sql::and_where_in`] to chain.
    ///
    /// **Warning**: an empty `values` appends ` where <key> in  ` (invalid SQL)
    /// and binds nothing. Check for emptiness before calling this method.
    pub fn where_in<T>(&self, key: &str, values: impl IntoIterator<Item = T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_in(" where ", key, values)
    }

    /// Append ` and <key> in ($n,...) `, numbering after the existing parameters.
    ///
    /// Same empty-list behaviour as [`Sql::where_in`].
    pub fn and_where_in<T>(&self, key: &str, values: impl IntoIterator<Item = T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_in(" and ", key, values)
    }

    fn push_in<T>(&self, joiner: &str, key: &str, values: impl IntoIterator<Item = T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let (list, params) = encode_batch(values, self.params.len() + 1);
        if params.is_empty() {
            tracing::warn!(
                target: "pgexec.sql",
                key,
                "empty value list for IN clause; the rendered SQL is invalid"
            );
        }
        let clause = Sql::from_parts(format!("{joiner}{key} in {list} "), params);
        self.concat(&clause)
    }

    /// Append ` limit <n>` as literal text.
    pub fn limit(&self, n: i64) -> Self {
        self.push_tail(&format!(" limit {n}"))
    }

    /// Append ` offset <n>` as literal text.
    pub fn offset(&self, n: i64) -> Self {
        self.push_tail(&format!(" offset {n}"))
    }

    /// Append ` order by <expr>`.
    ///
    /// `expr` is inserted verbatim and must never come from end users.
    pub fn order_by(&self, expr: &str) -> Self {
        self.push_tail(&format!(" order by {expr}"))
    }

    fn push_tail(&self, tail: &str) -> Self {
        let mut out = self.clone();
        out.sql.push_str(tail);
        out
    }

    /// Debug rendering of the text and parameters, for logs only.
    pub fn describe(&self) -> String {
        format!("str= {}\n params={:?}", self.sql, self.params)
    }

    // ==================== Execution ====================

    /// Execute against a pool or transaction.
    ///
    /// Returns rows affected for `update`/`delete` and the generated
    /// identifier for `insert`/`replace` (see [`crate::exec::interpret`]).
    ///
    /// # Example
    /// ```ignore
    /// let removed = pgexec::sql("delete from users")
    ///     .where_in("id", ["7", "9"])
    ///     .exec(&db)
    ///     .await?;
    /// ```
    pub async fn exec<'a>(&self, target: impl Into<ExecTarget<'a>>) -> ExecResult<i64> {
        let params = self.params_ref();
        target
            .into()
            .exec(&self.sql, &params, self.tag.as_deref())
            .await
    }

    /// Execute against a type-erased source, which must be a [`Db`](crate::Db)
    /// or a [`DbTx`](crate::DbTx).
    pub async fn exec_any(&self, source: &(dyn Any + Send + Sync)) -> ExecResult<i64> {
        let target = ExecTarget::from_any(source)?;
        self.exec(target).await
    }
}
