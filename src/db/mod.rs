// Database Module
// Connection seam and the queries the probe runs against Postgres

pub mod error;
pub mod pool;
pub mod queries;

use async_trait::async_trait;
use std::time::Duration;

pub use error::DbError;
pub use pool::{PostgresConnector, PostgresSession};

/// Fully resolved parameters for opening a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Host or resolved address
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// `None` waits for the server indefinitely
    pub connect_timeout: Option<Duration>,
}

/// Opens a session against the probed database
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn Session>, DbError>;
}

/// Queries the health checks need from an open connection
#[async_trait]
pub trait Session: Send + Sync {
    /// Result of `SELECT 'test' AS value`
    async fn liveness_value(&self) -> Result<String, DbError>;

    /// Number of locks held by backends whose query started more than `max_age_secs` ago
    async fn count_stale_locks(&self, max_age_secs: u32) -> Result<i64, DbError>;

    /// Number of backends whose query started more than `max_duration_secs` ago
    async fn count_long_queries(&self, max_duration_secs: u32) -> Result<i64, DbError>;

    /// Releases the connection
    async fn close(self: Box<Self>);
}
