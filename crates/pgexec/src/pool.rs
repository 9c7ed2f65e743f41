//! Connection pool construction

use crate::config::DbConfig;
use crate::error::{ExecError, ExecResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a `NoTls` pool from a database URL, sized per `config`.
pub fn create_pool(database_url: &str, config: &DbConfig) -> ExecResult<Pool> {
    create_pool_with_tls(database_url, NoTls, config)
}

/// Create a pool using a custom TLS connector.
///
/// This is the entrypoint to use when the database requires TLS.
pub fn create_pool_with_tls<T>(database_url: &str, tls: T, config: &DbConfig) -> ExecResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| ExecError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, tls, manager_config);
    Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| ExecError::Pool(e.to_string()))
}
