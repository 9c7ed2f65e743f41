use crate::error::{ExecError, ExecResult};

/// Driver-level result of executing one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawResult {
    rows_affected: u64,
    returned_id: Option<i64>,
}

impl RawResult {
    pub fn new(rows_affected: u64, returned_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            returned_id,
        }
    }

    /// Number of rows the statement changed.
    pub fn rows_affected(&self) -> ExecResult<i64> {
        i64::try_from(self.rows_affected).map_err(|_| {
            ExecError::Other(format!(
                "rows affected ({}) does not fit in i64",
                self.rows_affected
            ))
        })
    }

    /// Identifier generated by the statement.
    ///
    /// PostgreSQL only reports one when the statement has a `RETURNING`
    /// clause; otherwise this is [`ExecError::NoGeneratedId`].
    pub fn last_insert_id(&self) -> ExecResult<i64> {
        self.returned_id.ok_or(ExecError::NoGeneratedId)
    }
}
