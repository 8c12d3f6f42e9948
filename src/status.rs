//! Severity levels and the single status line reported to the monitoring system

use std::fmt;

/// Status level reported to the monitoring system, ordered by urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Warn,
    Crit,
    /// Reserved; no check currently produces it
    Unknown,
}

impl Severity {
    /// Numeric code printed at the start of the status line
    pub fn code(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warn => 1,
            Severity::Crit => 2,
            Severity::Unknown => 3,
        }
    }

    /// Text label printed after the service name
    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warn => "WARN",
            Severity::Crit => "CRIT",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub severity: Severity,
    pub message: String,
    /// Process exit code to use after printing
    pub exit_code: i32,
}

impl CheckResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Ok,
            message: message.into(),
            exit_code: 0,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            message: message.into(),
            exit_code: 0,
        }
    }

    pub fn crit(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            severity: Severity::Crit,
            message: message.into(),
            exit_code,
        }
    }

    /// Formats `<code> <service> - <label> - <message>` without the trailing newline
    pub fn status_line(&self, service: &str) -> String {
        format!(
            "{} {} - {} - {}",
            self.severity.code(),
            service,
            self.severity.label(),
            self.message
        )
    }
}
