use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Port used for the alternate DNS server when none is given
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Database connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database host as given on the command line
    pub host: String,
    /// Database port as given; validated when connecting
    pub port: i64,
    /// Database name
    pub name: String,
    /// Database user
    pub user: String,
    /// Connect timeout, `None` waits indefinitely
    pub connect_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Maps a timeout flag to a duration, where zero or less means no timeout
    pub fn connect_timeout_from_secs(seconds: i64) -> Option<Duration> {
        u64::try_from(seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Where the password comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    Literal(String),
    /// File whose full contents are the password
    File(PathBuf),
}

/// Optional thresholds, `None` meaning the check is disabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    /// Max lock age in seconds
    pub max_lock_age: Option<u32>,
    /// Max query duration in seconds
    pub max_query_duration: Option<u32>,
}

impl Thresholds {
    /// Builds thresholds from raw flag values, where zero or less disables a check
    pub fn from_seconds(max_lock_age: i64, max_query_duration: i64) -> Self {
        Self {
            max_lock_age: enabled(max_lock_age),
            max_query_duration: enabled(max_query_duration),
        }
    }
}

fn enabled(seconds: i64) -> Option<u32> {
    if seconds > 0 {
        Some(u32::try_from(seconds).unwrap_or(u32::MAX))
    } else {
        None
    }
}

/// Immutable configuration of one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Label printed in the status line
    pub service_name: String,
    pub database: DatabaseConfig,
    pub password: PasswordSource,
    /// Alternate DNS server used to resolve the host, as given
    pub dns_server: Option<String>,
    pub thresholds: Thresholds,
}

impl CheckConfig {
    /// Default service label for a host
    pub fn default_service_name(host: &str) -> String {
        format!("Postgres_{}", host)
    }
}

/// Parses `ip` or `ip:port` into a DNS server address
pub fn parse_dns_server(value: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let ip_str = value.trim_start_matches('[').trim_end_matches(']');
    ip_str
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| format!("Invalid DNS server address '{}'", value))
}
