//! Perceived-progress estimation.
//!
//! Actual progress from the chunk scheduler arrives in coarse jumps. The
//! estimator turns it into a smooth value that never goes backwards, holds
//! below 95 % until loading really finishes, and then fills to 100 %.
//!
//! - [`Estimator::advance`] / [`advance_estimator`]: the pure per-frame step
//! - [`ProgressAnimator`]: drives the step from a tokio interval against a
//!   [`ProgressWatcher`](crate::pipeline::ProgressWatcher)
//! - [`LoadingStatus`]: status text for a displayed percentage
//!
//! # Example
//!
//! ```ignore
//! use warmup::estimator::{advance_estimator, EstimatorState};
//!
//! let mut state = EstimatorState::new(0.0);
//! for frame in 1..=120 {
//!     state = advance_estimator(&state, actual_percent(), frame as f64 * 16.0);
//!     draw(state.animated());
//! }
//! ```

mod animator;
mod config;
mod state;
mod status;
mod step;

pub use animator::{AnimatedFrame, AnimationHandle, ProgressAnimator};
pub use config::{
    EstimatorConfig, DEFAULT_COMPLETION_EPSILON, DEFAULT_DURATION_MS, DEFAULT_FINISH_SMOOTHING,
    DEFAULT_FRAME_INTERVAL, DEFAULT_HOLD_CAP, DEFAULT_MAX_DURATION_MS, DEFAULT_MIN_DURATION_MS,
    DEFAULT_RAMP_SMOOTHING, DEFAULT_SAFETY_FACTOR, DEFAULT_SAMPLING_SMOOTHING,
    DEFAULT_SAMPLING_THRESHOLD, DEFAULT_SAMPLING_WINDOW_MS, REFERENCE_FRAME_MS,
};
pub use state::{EstimatorPhase, EstimatorState};
pub use status::LoadingStatus;
pub use step::{advance_estimator, Estimator};
