//! Settings structs for each configuration section.
//!
//! Each struct represents one `[section]` of the INI file.

use std::path::PathBuf;
use std::time::Duration;

use crate::asset::Priority;
use crate::estimator::EstimatorConfig;
use crate::pipeline::ChunkOptions;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub loader: LoaderSettings,
    pub estimator: EstimatorSettings,
    pub logging: LoggingSettings,
}

/// Loader and scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    /// Assets loaded concurrently per chunk (at least 1)
    pub chunk_size: usize,
    /// Pause between chunks in milliseconds
    pub inter_chunk_delay_ms: u64,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Delay before re-checking timing records in milliseconds
    pub size_probe_delay_ms: u64,
    /// Allow HEAD requests as the last size probe
    pub head_probe: bool,
}

impl LoaderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn size_probe_delay(&self) -> Duration {
        Duration::from_millis(self.size_probe_delay_ms)
    }

    /// Scheduler options for a given fetch priority.
    pub fn chunk_options(&self, priority: Priority) -> ChunkOptions {
        ChunkOptions::new(
            self.chunk_size,
            priority,
            Duration::from_millis(self.inter_chunk_delay_ms),
        )
    }
}

/// Progress estimator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorSettings {
    pub default_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub safety_factor: f64,
    /// Animation tick interval in milliseconds
    pub frame_interval_ms: u64,
}

impl EstimatorSettings {
    pub fn to_estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig::default()
            .with_durations(
                self.default_duration_ms,
                self.min_duration_ms,
                self.max_duration_ms,
            )
            .with_safety_factor(self.safety_factor)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory the log file is written to
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
