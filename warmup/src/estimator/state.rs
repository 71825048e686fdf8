//! Estimator state.

use std::fmt;

/// Phase of the progress estimator.
///
/// ```text
///            estimate available          actual == 100          gap < epsilon
/// Sampling ---------------------> Ramping -------------> Finishing ----------> Done
///     |                                                     ^
///     +-------------------- actual == 100 ------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimatorPhase {
    /// No duration estimate yet; follows actual progress with light smoothing.
    Sampling,
    /// Follows a time-based ramp derived from the duration estimate.
    Ramping,
    /// Actual progress reached 100; filling the rest of the way.
    Finishing,
    /// Terminal. The animated value is exactly 100.
    Done,
}

impl fmt::Display for EstimatorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EstimatorPhase::Sampling => "sampling",
            EstimatorPhase::Ramping => "ramping",
            EstimatorPhase::Finishing => "finishing",
            EstimatorPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// State of one visible loading session.
///
/// `animated` never decreases, stays within `[0, 100]`, and only reaches
/// 100 after actual progress has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorState {
    pub(super) animated: f64,
    pub(super) estimated_duration_ms: Option<f64>,
    pub(super) start_time_ms: f64,
    pub(super) last_frame_time_ms: f64,
    pub(super) phase: EstimatorPhase,
}

impl EstimatorState {
    /// Fresh state for a session starting at `start_time_ms`.
    pub fn new(start_time_ms: f64) -> Self {
        Self {
            animated: 0.0,
            estimated_duration_ms: None,
            start_time_ms,
            last_frame_time_ms: start_time_ms,
            phase: EstimatorPhase::Sampling,
        }
    }

    /// The value to display, in `[0, 100]`.
    pub fn animated(&self) -> f64 {
        self.animated
    }

    /// Estimated total duration, once computed.
    pub fn estimated_duration_ms(&self) -> Option<f64> {
        self.estimated_duration_ms
    }

    pub fn start_time_ms(&self) -> f64 {
        self.start_time_ms
    }

    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_frame_time_ms
    }

    pub fn phase(&self) -> EstimatorPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == EstimatorPhase::Done
    }
}
