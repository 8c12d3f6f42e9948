// Single-connection Postgres session used by the probe

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, warn};

use crate::db::error::DbError;
use crate::db::queries;
use crate::db::{ConnectParams, Connector, Session};

/// Acquire timeout used when no connect timeout is configured
const UNBOUNDED_CONNECT_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Opens sea-orm backed sessions against a Postgres server
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresConnector;

impl PostgresConnector {
    pub fn new() -> Self {
        Self
    }

    /// Builds driver options field by field so credentials never need URL encoding
    pub fn connect_options(params: &ConnectParams) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port);

        if !params.database.is_empty() {
            options = options.database(&params.database);
        }
        if !params.user.is_empty() {
            options = options.username(&params.user);
        }
        if !params.password.is_empty() {
            options = options.password(&params.password);
        }

        options
    }

    /// Pool acquire timeout standing in for the connect timeout
    pub fn acquire_timeout(params: &ConnectParams) -> Duration {
        params.connect_timeout.unwrap_or(UNBOUNDED_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn Session>, DbError> {
        debug!(
            "Connecting to postgres at {}:{} (timeout {:?})",
            params.host, params.port, params.connect_timeout
        );

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(0)
            .acquire_timeout(Self::acquire_timeout(params))
            .connect_with(Self::connect_options(params))
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                DbError::from(e)
            })?;

        Ok(Box::new(PostgresSession {
            connection: SqlxPostgresConnector::from_sqlx_postgres_pool(pool),
        }))
    }
}

/// Live connection to the probed database
pub struct PostgresSession {
    connection: DatabaseConnection,
}

#[async_trait]
impl Session for PostgresSession {
    async fn liveness_value(&self) -> Result<String, DbError> {
        queries::select_liveness_value(&self.connection).await
    }

    async fn count_stale_locks(&self, max_age_secs: u32) -> Result<i64, DbError> {
        queries::count_stale_locks(&self.connection, max_age_secs).await
    }

    async fn count_long_queries(&self, max_duration_secs: u32) -> Result<i64, DbError> {
        queries::count_long_queries(&self.connection, max_duration_secs).await
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.connection.close().await {
            warn!("Failed to close database connection: {}", e);
        }
    }
}
