//! Transaction helper macro.
//!
//! Statements take a [`DbTx`](crate::DbTx) anywhere they take a [`Db`](crate::Db),
//! so the same code runs with or without a transaction.
//!
//! # Example
//!
//! ```ignore
//! use pgexec::{ExecResult, sql};
//!
//! # async fn demo(db: &pgexec::Db) -> ExecResult<()> {
//! pgexec::transaction!(db, tx, {
//!     sql("update accounts set balance = balance - 100")
//!         .where_in("id", ["1"])
//!         .exec(&tx)
//!         .await?;
//!     sql("update accounts set balance = balance + 100")
//!         .where_in("id", ["2"])
//!         .exec(&tx)
//!         .await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a transaction begun on `$db`.
///
/// - Begins a transaction via `$db.begin().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`.
///
/// The block must evaluate to `pgexec::ExecResult<T>`; the macro evaluates
/// to the same type. A failed rollback is reported together with the error
/// that caused it.
#[macro_export]
macro_rules! transaction {
    ($db:expr, $tx:ident, $body:block) => {{
        let __pgexec_tx_begin: $crate::ExecResult<$crate::DbTx> = ($db).begin().await;
        match __pgexec_tx_begin {
            Err(error) => Err(error),
            Ok($tx) => {
                let __pgexec_tx_body_result = async { $body }.await;
                match __pgexec_tx_body_result {
                    Ok(value) => $tx.commit().await.map(|()| value),
                    Err(error) => match $tx.rollback().await {
                        Ok(()) => Err(error),
                        Err(rollback_err) => Err($crate::ExecError::Other(format!(
                            "{error} (rollback failed: {rollback_err})"
                        ))),
                    },
                }
            }
        }
    }};
}
