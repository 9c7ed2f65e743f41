use std::borrow::Cow;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// A `tracing`-based logger for statements about to be executed.
///
/// Events go to target `pgexec.sql` and are emitted **before** the statement
/// reaches the driver, so failing statements are logged too. Whether it fires
/// at all is decided by [`DbConfig::sql_logging`](crate::DbConfig::sql_logging).
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// The SQL as it will appear in the event: cut to `max_sql_length` bytes
    /// on a char boundary, with a trailing `...` when anything was dropped.
    pub(crate) fn shorten<'s>(&self, sql: &'s str) -> Cow<'s, str> {
        let Some(max) = self.max_sql_length.filter(|&max| sql.len() > max) else {
            return Cow::Borrowed(sql);
        };
        let end = (0..=max)
            .rev()
            .find(|&i| sql.is_char_boundary(i))
            .unwrap_or(0);
        Cow::Owned(format!("{}...", &sql[..end]))
    }

    pub(crate) fn emit(
        &self,
        target_kind: &str,
        tag: Option<&str>,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.shorten(sql);
        let tag = tag.unwrap_or("-");
        emit_at_level!(
            self.level,
            target: "pgexec.sql",
            kind = target_kind,
            tag,
            param_count = params.len(),
            sql = %sql,
            params = ?params,
            "exec"
        );
    }
}
