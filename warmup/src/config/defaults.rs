//! Default values for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::estimator;
use crate::loader;
use crate::pipeline;

// =============================================================================
// [loader]
// =============================================================================

/// Assets loaded concurrently per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = pipeline::DEFAULT_CHUNK_SIZE;

/// Pause between chunks in milliseconds.
pub const DEFAULT_INTER_CHUNK_DELAY_MS: u64 = pipeline::DEFAULT_INTER_CHUNK_DELAY.as_millis() as u64;

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = loader::DEFAULT_TIMEOUT_SECS;

/// Delay before the size probe re-checks timing records.
pub const DEFAULT_SIZE_PROBE_DELAY_MS: u64 = loader::DEFAULT_PROBE_RETRY_DELAY.as_millis() as u64;

/// Whether a HEAD request may be issued to learn an asset's size.
pub const DEFAULT_HEAD_PROBE: bool = true;

/// Largest accepted chunk size.
pub const MAX_CHUNK_SIZE: usize = 64;

// =============================================================================
// [estimator]
// =============================================================================

pub const DEFAULT_ESTIMATE_DURATION_MS: f64 = estimator::DEFAULT_DURATION_MS;
pub const DEFAULT_MIN_DURATION_MS: f64 = estimator::DEFAULT_MIN_DURATION_MS;
pub const DEFAULT_MAX_DURATION_MS: f64 = estimator::DEFAULT_MAX_DURATION_MS;
pub const DEFAULT_SAFETY_FACTOR: f64 = estimator::DEFAULT_SAFETY_FACTOR;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = estimator::DEFAULT_FRAME_INTERVAL.as_millis() as u64;

// =============================================================================
// [logging]
// =============================================================================

pub const DEFAULT_LOG_FILE: &str = "warmup.log";

/// Default log directory: `<cache_dir>/warmup/logs`, or `./logs`.
pub fn default_log_directory() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("warmup").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            loader: LoaderSettings {
                chunk_size: DEFAULT_CHUNK_SIZE,
                inter_chunk_delay_ms: DEFAULT_INTER_CHUNK_DELAY_MS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                size_probe_delay_ms: DEFAULT_SIZE_PROBE_DELAY_MS,
                head_probe: DEFAULT_HEAD_PROBE,
            },
            estimator: EstimatorSettings {
                default_duration_ms: DEFAULT_ESTIMATE_DURATION_MS,
                min_duration_ms: DEFAULT_MIN_DURATION_MS,
                max_duration_ms: DEFAULT_MAX_DURATION_MS,
                safety_factor: DEFAULT_SAFETY_FACTOR,
                frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
