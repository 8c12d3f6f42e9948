//! Command line flags of the probe

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{CheckConfig, DatabaseConfig, PasswordSource, Thresholds};

/// Nagios-style health probe for PostgreSQL
#[derive(Debug, Parser)]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Print the version info and exit
    #[arg(short = 'v')]
    pub version: bool,

    /// Service name (defaults to Postgres_<host>)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub service: String,

    /// Host
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub host: String,

    /// Port
    #[arg(long, default_value_t = 5432, allow_negative_numbers = true)]
    pub port: i64,

    /// Database
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub db: String,

    /// User
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub user: String,

    /// Password
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub password: String,

    /// File to read password from
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub passwordfile: String,

    /// Use alternate dns server (ip or ip:port)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub dns: String,

    /// Connection timeout in seconds, 0 waits indefinitely
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub conntimeout: i64,

    /// Maximum lock age in seconds
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub maxlockage: i64,

    /// Maximum query duration in seconds
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub maxqueryduration: i64,
}

impl Cli {
    /// Parses the process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Resolves the flags into an immutable configuration
    pub fn into_config(self) -> CheckConfig {
        let service_name = if self.service.is_empty() {
            CheckConfig::default_service_name(&self.host)
        } else {
            self.service
        };

        let password = if self.passwordfile.is_empty() {
            PasswordSource::Literal(self.password)
        } else {
            PasswordSource::File(PathBuf::from(self.passwordfile))
        };

        let dns_server = Some(self.dns).filter(|dns| !dns.is_empty());

        CheckConfig {
            service_name,
            database: DatabaseConfig {
                host: self.host,
                port: self.port,
                name: self.db,
                user: self.user,
                connect_timeout: DatabaseConfig::connect_timeout_from_secs(self.conntimeout),
            },
            password,
            dns_server,
            thresholds: Thresholds::from_seconds(self.maxlockage, self.maxqueryduration),
        }
    }
}

/// Flags that consume the following argument as their value
const VALUE_FLAGS: &[&str] = &[
    "service",
    "host",
    "port",
    "db",
    "user",
    "password",
    "passwordfile",
    "dns",
    "conntimeout",
    "maxlockage",
    "maxqueryduration",
];

/// Rewrites `-flag` and `-flag=value` into `--flag` forms; `-v`, numbers and
/// the argument following a value flag stay as they are
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut out: Vec<OsString> = iter.next().into_iter().collect();
    let mut passthrough = false;
    let mut expect_value = false;

    for arg in iter {
        if passthrough || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(s) => {
                expect_value = takes_separate_value(s);
                is_single_dash_long(s).then(|| OsString::from(format!("-{}", s)))
            }
            None => None,
        };
        out.push(rewritten.unwrap_or(arg));
    }

    out
}

fn takes_separate_value(arg: &str) -> bool {
    let name = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('-'))
        .unwrap_or_default();
    !name.contains('=') && VALUE_FLAGS.contains(&name)
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    if name.starts_with('-') || name.parse::<f64>().is_ok() {
        return false;
    }
    let flag = name.split('=').next().unwrap_or(name);
    flag.chars().count() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("pg-health-check")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    #[test]
    fn test_normalize_args() {
        let args = ["bin", "-host", "db1", "-port=6432", "--db", "app", "-v", "-5"]
            .into_iter()
            .map(OsString::from);
        let normalized: Vec<OsString> = normalize_args(args);
        assert_eq!(
            normalized,
            ["bin", "--host", "db1", "--port=6432", "--db", "app", "-v", "-5"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-host", "db1"]);
        assert!(!cli.version);
        assert_eq!(cli.port, 5432);
        assert_eq!(cli.conntimeout, 5);
        assert_eq!(cli.maxlockage, 0);
        assert_eq!(cli.maxqueryduration, 0);

        let config = cli.into_config();
        assert_eq!(config.service_name, "Postgres_db1");
        assert_eq!(
            config.database.connect_timeout,
            Some(Duration::from_secs(5))
        );
        assert_eq!(config.password, PasswordSource::Literal(String::new()));
        assert_eq!(config.dns_server, None);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn test_password_file_overrides_password() {
        let config = parse(&[
            "-host",
            "db1",
            "-password",
            "secret",
            "-passwordfile",
            "/run/secrets/pg",
        ])
        .into_config();
        assert_eq!(
            config.password,
            PasswordSource::File(PathBuf::from("/run/secrets/pg"))
        );
    }

    #[test]
    fn test_full_flag_set() {
        let config = parse(&[
            "-service",
            "main-db",
            "-host=db1",
            "-port",
            "6432",
            "-db",
            "app",
            "-user",
            "monitor",
            "-dns",
            "10.0.0.2",
            "-conntimeout",
            "3",
            "-maxlockage",
            "30",
            "-maxqueryduration",
            "-1",
        ])
        .into_config();

        assert_eq!(config.service_name, "main-db");
        assert_eq!(config.database.host, "db1");
        assert_eq!(config.database.port, 6432);
        assert_eq!(config.database.name, "app");
        assert_eq!(config.database.user, "monitor");
        assert_eq!(config.dns_server.as_deref(), Some("10.0.0.2"));
        assert_eq!(config.thresholds.max_lock_age, Some(30));
        assert_eq!(config.thresholds.max_query_duration, None);
    }

    #[test]
    fn test_values_starting_with_dash() {
        let cli = parse(&[
            "-host",
            "db1",
            "-password",
            "-secret",
            "-user",
            "-monitor",
            "--db",
            "-app",
            "-service=-svc",
        ]);
        assert_eq!(cli.password, "-secret");
        assert_eq!(cli.user, "-monitor");
        assert_eq!(cli.db, "-app");
        assert_eq!(cli.service, "-svc");
    }

    #[test]
    fn test_zero_conntimeout_disables_timeout() {
        let config = parse(&["-host", "db1", "-conntimeout", "0"]).into_config();
        assert_eq!(config.database.connect_timeout, None);
    }

    #[test]
    fn test_out_of_range_port_is_accepted() {
        let config = parse(&["-host", "db1", "-port", "70000"]).into_config();
        assert_eq!(config.database.port, 70000);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let args = ["bin", "-bogus", "1"].into_iter().map(OsString::from);
        assert!(Cli::try_parse_from(normalize_args(args)).is_err());
    }
}
