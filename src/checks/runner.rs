//! The ordered probe sequence
//!
//! Steps run once, top to bottom: resolve host, resolve password, connect,
//! liveness, lock age, query duration. The first failure or exceeded
//! threshold ends the run. Lock age is always checked before query duration.

use tracing::{debug, info, warn};

use crate::config::{CheckConfig, PasswordSource};
use crate::db::queries::LIVENESS_VALUE;
use crate::db::{ConnectParams, Connector, DbError, Session};
use crate::dns::HostResolver;
use crate::error::{CheckError, Endpoint};
use crate::status::CheckResult;

/// Runs the health checks for one configuration
pub struct CheckRunner<'a> {
    config: &'a CheckConfig,
    resolver: &'a dyn HostResolver,
    connector: &'a dyn Connector,
}

impl<'a> CheckRunner<'a> {
    pub fn new(
        config: &'a CheckConfig,
        resolver: &'a dyn HostResolver,
        connector: &'a dyn Connector,
    ) -> Self {
        Self {
            config,
            resolver,
            connector,
        }
    }

    /// Produces exactly one result; errors become CRIT results
    pub async fn run(&self) -> CheckResult {
        match self.execute().await {
            Ok(result) => result,
            Err(e) => {
                warn!("Check failed: {}", e);
                CheckResult::from(e)
            }
        }
    }

    async fn execute(&self) -> Result<CheckResult, CheckError> {
        let host = self.resolve_host().await?;
        let password = self.resolve_password().await?;

        let db = &self.config.database;
        let endpoint = Endpoint {
            database: db.name.clone(),
            host: host.clone(),
            port: db.port,
        };
        let port = u16::try_from(db.port)
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| CheckError::Connection {
                endpoint: endpoint.clone(),
                user: db.user.clone(),
                source: DbError::ConnectionError(format!("invalid port {}", db.port)),
            })?;
        let params = ConnectParams {
            host,
            port,
            database: db.name.clone(),
            user: db.user.clone(),
            password,
            connect_timeout: db.connect_timeout,
        };

        let session = self
            .connector
            .connect(&params)
            .await
            .map_err(|source| CheckError::Connection {
                endpoint: endpoint.clone(),
                user: db.user.clone(),
                source,
            })?;

        let outcome = self.check_session(session.as_ref(), &endpoint).await;
        session.close().await;
        outcome
    }

    async fn resolve_host(&self) -> Result<String, CheckError> {
        let host = &self.config.database.host;

        let Some(dns) = self.config.dns_server.as_deref() else {
            return Ok(host.clone());
        };

        let resolved =
            self.resolver
                .resolve(host, dns)
                .await
                .map_err(|source| CheckError::Resolution {
                    host: host.clone(),
                    dns: dns.to_string(),
                    source,
                })?;
        debug!("Resolved {} to {} via {}", host, resolved, dns);
        Ok(resolved)
    }

    async fn resolve_password(&self) -> Result<String, CheckError> {
        match &self.config.password {
            PasswordSource::Literal(password) => Ok(password.clone()),
            PasswordSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| CheckError::PasswordFile {
                        path: path.clone(),
                        source,
                    })?;
                // The driver takes the password as text
                Ok(String::from_utf8(bytes)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
            }
        }
    }

    async fn check_session(
        &self,
        session: &dyn Session,
        endpoint: &Endpoint,
    ) -> Result<CheckResult, CheckError> {
        let value = session
            .liveness_value()
            .await
            .map_err(|source| CheckError::Liveness {
                endpoint: endpoint.clone(),
                source,
            })?;
        if value != LIVENESS_VALUE {
            return Err(CheckError::Integrity {
                endpoint: endpoint.clone(),
                value,
            });
        }

        let thresholds = self.config.thresholds;

        if let Some(max_age) = thresholds.max_lock_age {
            let count = session
                .count_stale_locks(max_age)
                .await
                .map_err(|source| CheckError::LockQuery {
                    endpoint: endpoint.clone(),
                    source,
                })?;
            if count > 0 {
                return Ok(CheckResult::warn(format!(
                    "{} locks on {} have exceeded the max age of {} seconds",
                    count, endpoint, max_age
                )));
            }
        }

        if let Some(max_duration) = thresholds.max_query_duration {
            let count = session
                .count_long_queries(max_duration)
                .await
                .map_err(|source| CheckError::DurationQuery {
                    endpoint: endpoint.clone(),
                    source,
                })?;
            if count > 0 {
                return Ok(CheckResult::warn(format!(
                    "{} queries on {} have exceeded the max duration of {} seconds",
                    count, endpoint, max_duration
                )));
            }
        }

        info!("Postgres {} is healthy", endpoint);
        Ok(CheckResult::ok(format!(
            "Postgres {} is up and running",
            endpoint
        )))
    }
}
