//! Terminal failures of a probe run and how they are reported

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::db::DbError;
use crate::dns::ResolveError;
use crate::status::CheckResult;

/// Database a failure refers to, rendered as `database '<name>' on <host>:<port>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub database: String,
    pub host: String,
    pub port: i64,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "database '{}' on {}:{}",
            self.database, self.host, self.port
        )
    }
}

/// Every way a probe run can stop before reaching a verdict
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Error resolving ip of {host} via dns {dns}: {source}")]
    Resolution {
        host: String,
        dns: String,
        #[source]
        source: ResolveError,
    },

    #[error("Error reading password file {}: {source}", .path.display())]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error connecting to postgres {endpoint} using user '{user}': {source}")]
    Connection {
        endpoint: Endpoint,
        user: String,
        #[source]
        source: DbError,
    },

    #[error("Error testing connection on {endpoint}: {source}")]
    Liveness {
        endpoint: Endpoint,
        #[source]
        source: DbError,
    },

    #[error("Error testing connection on {endpoint}: Postgres returned '{value}' instead of 'test'")]
    Integrity { endpoint: Endpoint, value: String },

    #[error("Error loading active locks for {endpoint}: {source}")]
    LockQuery {
        endpoint: Endpoint,
        #[source]
        source: DbError,
    },

    #[error("Error loading long running queries for {endpoint}: {source}")]
    DurationQuery {
        endpoint: Endpoint,
        #[source]
        source: DbError,
    },
}

impl CheckError {
    /// Exit code the process ends with after reporting this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckError::PasswordFile { .. } => 1,
            _ => 0,
        }
    }
}

impl From<CheckError> for CheckResult {
    fn from(err: CheckError) -> Self {
        CheckResult::crit(err.to_string(), err.exit_code())
    }
}
