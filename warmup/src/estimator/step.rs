//! The estimator step function.
//!
//! [`Estimator::advance`] is pure: it takes the previous state, the latest
//! actual progress and the current frame time, and returns the next state.
//! Hosts call it from whatever drives their frames (an animation callback,
//! a timer, or a plain loop in tests).

use tracing::debug;

use super::config::EstimatorConfig;
use super::state::{EstimatorPhase, EstimatorState};

/// Smoothed, monotonic progress estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Begin a session at `now_ms`.
    pub fn start(&self, now_ms: f64) -> EstimatorState {
        EstimatorState::new(now_ms)
    }

    /// Advance one animation tick.
    ///
    /// `actual` is clamped to `[0, 100]`. A `now_ms` earlier than the previous
    /// frame is treated as a zero-length frame.
    pub fn advance(&self, state: &EstimatorState, actual: f64, now_ms: f64) -> EstimatorState {
        let mut next = *state;
        next.last_frame_time_ms = state.last_frame_time_ms.max(now_ms);

        if state.phase == EstimatorPhase::Done {
            next.animated = 100.0;
            return next;
        }

        let config = &self.config;
        let actual = sanitize(actual);
        let frame_ms = (now_ms - state.last_frame_time_ms).max(0.0);
        let elapsed_ms = (now_ms - state.start_time_ms).max(0.0);
        let scale = frame_ms / config.reference_frame_ms;

        if next.estimated_duration_ms.is_none() && config.should_estimate(elapsed_ms, actual) {
            let estimate = config.estimate_duration(elapsed_ms, actual);
            next.estimated_duration_ms = Some(estimate);
            next.phase = EstimatorPhase::Ramping;
            debug!(
                elapsed_ms,
                actual,
                estimated_ms = estimate,
                "loading duration estimated"
            );
        }

        if actual >= 100.0 && next.phase == EstimatorPhase::Ramping {
            next.phase = EstimatorPhase::Finishing;
            debug!(elapsed_ms, animated = next.animated, "loading complete, finishing");
        }

        match next.phase {
            EstimatorPhase::Sampling => {
                let target = actual.min(config.hold_cap);
                next.animated = approach(next.animated, target, config.sampling_smoothing * scale);
            }
            EstimatorPhase::Ramping => {
                let duration = next
                    .estimated_duration_ms
                    .unwrap_or(config.default_duration_ms);
                let fill_target =
                    (elapsed_ms / duration * config.hold_cap).min(config.hold_cap);
                next.animated = approach(next.animated, fill_target, config.ramp_smoothing * scale);
            }
            EstimatorPhase::Finishing => {
                next.animated = approach(next.animated, 100.0, config.finish_smoothing * scale);
                if 100.0 - next.animated < config.completion_epsilon {
                    next.animated = 100.0;
                    next.phase = EstimatorPhase::Done;
                }
            }
            EstimatorPhase::Done => next.animated = 100.0,
        }

        next
    }

    /// Settle the state when the host starts fading the loading surface out.
    ///
    /// Snaps to done if loading actually finished, otherwise freezes the
    /// current value.
    pub fn settle(&self, state: &EstimatorState, actual: f64) -> EstimatorState {
        let mut next = *state;
        if sanitize(actual) >= 100.0 {
            next.animated = 100.0;
            next.phase = EstimatorPhase::Done;
        }
        next
    }
}

/// Advance `state` with the default configuration.
pub fn advance_estimator(state: &EstimatorState, actual: f64, now_ms: f64) -> EstimatorState {
    Estimator::default().advance(state, actual, now_ms)
}

fn sanitize(actual: f64) -> f64 {
    if actual.is_nan() {
        0.0
    } else {
        actual.clamp(0.0, 100.0)
    }
}

/// Move `current` toward `target` by `factor` of the gap, never backward.
fn approach(current: f64, target: f64, factor: f64) -> f64 {
    if target <= current {
        return current;
    }
    current + (target - current) * factor.clamp(0.0, 1.0)
}
