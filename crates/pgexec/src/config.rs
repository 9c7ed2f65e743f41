use crate::log::SqlLogger;
use tracing::Level;

/// Configuration for a [`Db`](crate::Db) and the transactions it begins.
///
/// SQL logging is disabled by default and must be explicitly enabled.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Maximum number of pooled connections (used by [`Db::connect_with_config`](crate::Db::connect_with_config)).
    pub max_pool_size: usize,
    /// Whether statements are logged before execution.
    pub sql_logging: bool,
    /// How statements are logged.
    pub sql_log: SqlLogger,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_pool_size: 16,
            sql_logging: false,
            sql_log: SqlLogger::default(),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults (16 connections, logging disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum pool size.
    pub fn max_pool_size(mut self, max_size: usize) -> Self {
        self.max_pool_size = max_size;
        self
    }

    /// Log every statement (text, tag and parameters) before it runs.
    pub fn enable_sql_logging(mut self) -> Self {
        self.sql_logging = true;
        self
    }

    /// Disable statement logging.
    pub fn disable_sql_logging(mut self) -> Self {
        self.sql_logging = false;
        self
    }

    /// Set the tracing level statement logs are emitted at.
    pub fn sql_log_level(mut self, level: Level) -> Self {
        self.sql_log = self.sql_log.level(level);
        self
    }

    /// Replace the statement logger settings.
    pub fn sql_logger(mut self, logger: SqlLogger) -> Self {
        self.sql_log = logger;
        self
    }
}
