//! Nagios-style PostgreSQL health probe
//!
//! Connects to a database, confirms it answers queries, optionally counts
//! stale locks and long running queries, and reduces the outcome to a single
//! status line.

pub mod checks;
pub mod cli;
pub mod config;
pub mod db;
pub mod dns;
pub mod error;
pub mod status;
pub mod utils;

pub use checks::CheckRunner;
pub use config::CheckConfig;
pub use status::{CheckResult, Severity};
