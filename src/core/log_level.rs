//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity levels understood by the platform syslog facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyslogSeverity {
    Alert,
    Err,
    Warning,
    Info,
    Debug,
}

impl SyslogSeverity {
    /// Numeric priority as defined by POSIX `<syslog.h>`
    pub const fn code(self) -> i32 {
        match self {
            SyslogSeverity::Alert => 1,
            SyslogSeverity::Err => 3,
            SyslogSeverity::Warning => 4,
            SyslogSeverity::Info => 6,
            SyslogSeverity::Debug => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SyslogSeverity::Alert => "ALERT",
            SyslogSeverity::Err => "ERR",
            SyslogSeverity::Warning => "WARNING",
            SyslogSeverity::Info => "INFO",
            SyslogSeverity::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for SyslogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Log levels. The discriminant indexes the lookup tables below and
/// the per-level default styles; levels are not ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
    Fatal = 3,
    Debug = 4,
    Verbose = 5,
}

const LEVEL_NAMES: [&str; LogLevel::COUNT] =
    ["Info", "Warning", "Error", "Fatal", "Debug", "Verbose"];

const LEVEL_SEVERITIES: [SyslogSeverity; LogLevel::COUNT] = [
    SyslogSeverity::Info,
    SyslogSeverity::Warning,
    SyslogSeverity::Err,
    SyslogSeverity::Alert,
    SyslogSeverity::Debug,
    SyslogSeverity::Debug,
];

impl LogLevel {
    pub const COUNT: usize = 6;

    pub const ALL: [LogLevel; LogLevel::COUNT] = [
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Debug,
        LogLevel::Verbose,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name, also used by the serialized record format
    pub const fn to_str(self) -> &'static str {
        LEVEL_NAMES[self.index()]
    }

    pub const fn syslog_severity(self) -> SyslogSeverity {
        LEVEL_SEVERITIES[self.index()]
    }

    /// Whether records of this level reach any destination.
    ///
    /// Debug records require the `debug-level` feature, Verbose records
    /// require the runtime verbose flag.
    #[inline]
    pub fn is_enabled(self, verbose: bool) -> bool {
        match self {
            LogLevel::Debug => cfg!(feature = "debug-level"),
            LogLevel::Verbose => verbose,
            _ => true,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Info" => Ok(LogLevel::Info),
            "Warning" | "Warn" => Ok(LogLevel::Warn),
            "Error" => Ok(LogLevel::Error),
            "Fatal" => Ok(LogLevel::Fatal),
            "Debug" => Ok(LogLevel::Debug),
            "Verbose" => Ok(LogLevel::Verbose),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
