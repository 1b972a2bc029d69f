//! Engine log levels and subscriber setup.

use serde::{Deserialize, Serialize};

/// Engine logging verbosity, ordered by increasing verbosity.
///
/// Raw values are the ones exposed to hosts as `LOG_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    Error,
    Warning,
    Info,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Quiet,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
    ];

    pub fn raw(self) -> i32 {
        match self {
            LogLevel::Quiet => -8,
            LogLevel::Error => 16,
            LogLevel::Warning => 24,
            LogLevel::Info => 32,
        }
    }

    pub fn from_raw(raw: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| i64::from(level.raw()) == raw)
    }

    pub fn as_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Quiet => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Error
    }
}

/// Install the fmt subscriber for binaries and host processes.
///
/// `RUST_LOG` overrides the default `info` directive. Records emitted through
/// the `log` macros are bridged into the subscriber. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
