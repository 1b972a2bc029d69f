//! Configuration management for the playback host
//!
//! This module provides runtime configuration loading from JSON files, so
//! the initial engine verbosity, auto-connect order and the emulated dummy
//! devices can be adjusted without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::backend::{BackendKind, DummyConfig};
use crate::logging::LogLevel;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PLAYBACK_HOST_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "assets/host_config.json";

/// Complete host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Engine verbosity applied when the engine handle is created
    pub log_level: LogLevel,
    /// Order in which auto-connect tries backend kinds
    pub backend_priority: Vec<BackendKind>,
    /// Buffer size of the host event broadcast channel
    pub event_capacity: usize,
    /// Emulated hosts served by the dummy backend
    pub dummy: DummyConfig,
}

impl Default for HostConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            backend_priority: BackendKind::ALL.to_vec(),
            event_capacity: 64,
            dummy: DummyConfig::default(),
        }
    }
}

impl HostConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// its JSON is invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load from `$PLAYBACK_HOST_CONFIG`, else `assets/host_config.json`.
    pub fn load() -> Self {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::load_from_file(path),
            _ => Self::load_from_file(DEFAULT_CONFIG_PATH),
        }
    }
}
