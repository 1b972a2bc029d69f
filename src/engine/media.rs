//! Media engine handle: version and logging state of the decoding/analysis
//! engine the collaborators run on.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Engine build version. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTriple {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTriple {
    /// Version of the linked engine (this crate's package version).
    pub fn current() -> Self {
        Self {
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
        }
    }
}

/// Opaque handle to the media engine. Exactly one is owned by
/// [`crate::engine::EngineHandles`]; everything else borrows it.
pub struct MediaEngine {
    version: VersionTriple,
    log_level: AtomicU8,
}

impl MediaEngine {
    pub(crate) fn create(initial_level: LogLevel) -> Self {
        let engine = Self {
            version: VersionTriple::current(),
            log_level: AtomicU8::new(Self::encode(initial_level)),
        };
        engine.apply_level(initial_level);
        log::info!(
            "[MediaEngine] created v{}.{}.{}",
            engine.version.major,
            engine.version.minor,
            engine.version.patch
        );
        engine
    }

    pub fn version(&self) -> VersionTriple {
        self.version
    }

    pub fn log_level(&self) -> LogLevel {
        match self.log_level.load(Ordering::SeqCst) {
            0 => LogLevel::Quiet,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            _ => LogLevel::Info,
        }
    }

    /// Change engine-wide verbosity; affects every later log record in the
    /// process, not just this handle.
    pub(crate) fn set_log_level(&self, level: LogLevel) {
        self.log_level.store(Self::encode(level), Ordering::SeqCst);
        self.apply_level(level);
    }

    pub(crate) fn destroy(self) {
        log::info!("[MediaEngine] destroyed");
    }

    fn apply_level(&self, level: LogLevel) {
        log::set_max_level(level.as_filter());
    }

    fn encode(level: LogLevel) -> u8 {
        match level {
            LogLevel::Quiet => 0,
            LogLevel::Error => 1,
            LogLevel::Warning => 2,
            LogLevel::Info => 3,
        }
    }
}
