//! Named severities accepted by the logging meta endpoint.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.as_str().to_string()).collect()
    }

    /// Log the fixed test message at this level. `tracing` has no critical
    /// level, so critical is an error event tagged `critical = true`.
    pub fn emit_test_entry(self) {
        match self {
            LogLevel::Debug => debug!("debug log message - from logging meta endpoint"),
            LogLevel::Info => info!("info log message - from logging meta endpoint"),
            LogLevel::Warning => warn!("warning log message - from logging meta endpoint"),
            LogLevel::Error => error!("error log message - from logging meta endpoint"),
            LogLevel::Critical => {
                error!(critical = true, "critical log message - from logging meta endpoint")
            }
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLogLevel(s.to_string()))
    }
}
