//! Host resolution through an alternate DNS server

use std::net::SocketAddr;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;
use tracing::debug;

use crate::config::parse_dns_server;

/// Failure to turn a host name into an address
#[derive(Debug, Error)]
#[error("Can't resolve '{host}' on {server}: {reason}")]
pub struct ResolveError {
    pub host: String,
    pub server: String,
    pub reason: String,
}

impl ResolveError {
    pub fn new(host: &str, server: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            host: host.to_string(),
            server: server.to_string(),
            reason: reason.into(),
        }
    }

    pub fn no_results(host: &str, server: impl ToString) -> Self {
        Self::new(host, server, "No results")
    }
}

/// Resolves a host to an IPv4 address through a specific DNS server
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// `server` is the DNS server address as given, `ip` or `ip:port`
    async fn resolve(&self, host: &str, server: &str) -> Result<String, ResolveError>;
}

/// A-record lookups via `hickory-resolver`, bypassing the system resolver
#[derive(Debug, Clone)]
pub struct DnsResolver {
    opts: ResolverOpts,
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsResolver {
    pub fn new() -> Self {
        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;
        Self { opts }
    }

    fn resolver_for(&self, server: SocketAddr) -> TokioAsyncResolver {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(server, Protocol::Udp));
        TokioAsyncResolver::tokio(config, self.opts.clone())
    }
}

/// Appends the root label so search domains are never applied
pub fn fully_qualified(host: &str) -> String {
    if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{}.", host)
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str, server: &str) -> Result<String, ResolveError> {
        let addr =
            parse_dns_server(server).map_err(|reason| ResolveError::new(host, server, reason))?;
        debug!("Resolving {} via {}", host, addr);

        let lookup = self
            .resolver_for(addr)
            .ipv4_lookup(fully_qualified(host))
            .await
            .map_err(|e| match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => ResolveError::no_results(host, server),
                _ => ResolveError::new(host, server, e.to_string()),
            })?;

        lookup
            .iter()
            .next()
            .map(|record| record.to_string())
            .ok_or_else(|| ResolveError::no_results(host, server))
    }
}
