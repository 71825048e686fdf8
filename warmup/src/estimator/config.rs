//! Tuning constants for the progress estimator.
//!
//! The duration clamp, the default duration and the safety factor are UX
//! tuning values; they are kept as overridable defaults.

use std::time::Duration;

/// Per-tick smoothing factor while sampling.
pub const DEFAULT_SAMPLING_SMOOTHING: f64 = 0.3;

/// Per-tick smoothing factor while following the time ramp.
pub const DEFAULT_RAMP_SMOOTHING: f64 = 0.2;

/// Per-tick smoothing factor for the final fill to 100.
pub const DEFAULT_FINISH_SMOOTHING: f64 = 0.15;

/// Highest value shown before loading has actually finished.
pub const DEFAULT_HOLD_CAP: f64 = 95.0;

/// Frame length the smoothing factors are expressed against.
pub const REFERENCE_FRAME_MS: f64 = 16.0;

/// Actual progress at which the duration is estimated.
pub const DEFAULT_SAMPLING_THRESHOLD: f64 = 50.0;

/// Elapsed time after which the duration is estimated regardless of progress.
pub const DEFAULT_SAMPLING_WINDOW_MS: f64 = 2000.0;

/// Duration assumed when no progress was observed while sampling.
pub const DEFAULT_DURATION_MS: f64 = 6000.0;

/// Lower clamp for the estimated duration.
pub const DEFAULT_MIN_DURATION_MS: f64 = 3000.0;

/// Upper clamp for the estimated duration.
pub const DEFAULT_MAX_DURATION_MS: f64 = 10000.0;

/// Multiplier applied after clamping.
pub const DEFAULT_SAFETY_FACTOR: f64 = 1.2;

/// Gap to 100 below which the final fill snaps to done.
pub const DEFAULT_COMPLETION_EPSILON: f64 = 0.1;

/// Default animation tick interval for the async driver (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Estimator tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pub sampling_smoothing: f64,
    pub ramp_smoothing: f64,
    pub finish_smoothing: f64,
    pub hold_cap: f64,
    pub reference_frame_ms: f64,
    pub sampling_threshold: f64,
    pub sampling_window_ms: f64,
    pub default_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub safety_factor: f64,
    pub completion_epsilon: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            sampling_smoothing: DEFAULT_SAMPLING_SMOOTHING,
            ramp_smoothing: DEFAULT_RAMP_SMOOTHING,
            finish_smoothing: DEFAULT_FINISH_SMOOTHING,
            hold_cap: DEFAULT_HOLD_CAP,
            reference_frame_ms: REFERENCE_FRAME_MS,
            sampling_threshold: DEFAULT_SAMPLING_THRESHOLD,
            sampling_window_ms: DEFAULT_SAMPLING_WINDOW_MS,
            default_duration_ms: DEFAULT_DURATION_MS,
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            safety_factor: DEFAULT_SAFETY_FACTOR,
            completion_epsilon: DEFAULT_COMPLETION_EPSILON,
        }
    }
}

impl EstimatorConfig {
    /// Override the duration bounds and fallback.
    pub fn with_durations(mut self, default_ms: f64, min_ms: f64, max_ms: f64) -> Self {
        self.default_duration_ms = default_ms;
        self.min_duration_ms = min_ms.min(max_ms);
        self.max_duration_ms = max_ms.max(min_ms);
        self
    }

    pub fn with_safety_factor(mut self, factor: f64) -> Self {
        self.safety_factor = factor;
        self
    }

    /// Whether enough has been observed to estimate the total duration.
    pub fn should_estimate(&self, elapsed_ms: f64, actual: f64) -> bool {
        actual >= self.sampling_threshold || elapsed_ms > self.sampling_window_ms
    }

    /// Extrapolate the total duration from the progress seen so far.
    ///
    /// Falls back to the default duration when no progress was observed,
    /// then clamps and applies the safety factor.
    pub fn estimate_duration(&self, elapsed_ms: f64, actual: f64) -> f64 {
        let raw = if actual > 0.0 {
            elapsed_ms * (100.0 / actual)
        } else {
            self.default_duration_ms
        };
        raw.clamp(self.min_duration_ms, self.max_duration_ms) * self.safety_factor
    }
}
