//! Async driver for the estimator.
//!
//! Terminals have no animation-frame callback, so the animator ticks the
//! pure step function from a tokio interval and republishes each frame on a
//! `watch` channel. Readers only ever see the latest frame.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::config::DEFAULT_FRAME_INTERVAL;
use super::state::{EstimatorPhase, EstimatorState};
use super::status::LoadingStatus;
use super::step::Estimator;
use crate::pipeline::ProgressWatcher;

/// One rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedFrame {
    pub animated: f64,
    pub phase: EstimatorPhase,
    pub status: LoadingStatus,
}

impl AnimatedFrame {
    fn from_state(state: &EstimatorState) -> Self {
        Self {
            animated: state.animated(),
            phase: state.phase(),
            status: LoadingStatus::from_percent(state.animated()),
        }
    }
}

impl Default for AnimatedFrame {
    fn default() -> Self {
        Self::from_state(&EstimatorState::new(0.0))
    }
}

/// Ticks an [`Estimator`] against a live actual-progress feed.
#[derive(Debug, Clone, Copy)]
pub struct ProgressAnimator {
    estimator: Estimator,
    frame_interval: Duration,
}

impl Default for ProgressAnimator {
    fn default() -> Self {
        Self::new(Estimator::default())
    }
}

impl ProgressAnimator {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Set the tick interval. Zero is raised to one millisecond.
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval.max(Duration::from_millis(1));
        self
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Start animating on the current tokio runtime.
    ///
    /// The task ends when the estimator reaches done, when
    /// [`AnimationHandle::begin_fade`] is called, or when the handle is
    /// cancelled or dropped.
    pub fn spawn(&self, watcher: ProgressWatcher) -> AnimationHandle {
        let (frames_tx, frames_rx) = watch::channel(AnimatedFrame::default());
        let (fading_tx, fading_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_animation(
            self.estimator,
            self.frame_interval,
            watcher,
            frames_tx,
            fading_rx,
            cancel.clone(),
        ));

        AnimationHandle {
            frames: frames_rx,
            fading: fading_tx,
            cancel,
            task: Some(task),
        }
    }
}

async fn run_animation(
    estimator: Estimator,
    frame_interval: Duration,
    watcher: ProgressWatcher,
    frames: watch::Sender<AnimatedFrame>,
    mut fading: watch::Receiver<bool>,
    cancel: CancellationToken,
) -> EstimatorState {
    let started = Instant::now();
    let mut state = estimator.start(0.0);
    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(animated = state.animated(), "progress animation cancelled");
                break;
            }

            changed = fading.changed() => {
                if changed.is_err() {
                    break;
                }
                if *fading.borrow() {
                    state = estimator.settle(&state, watcher.latest());
                    frames.send_replace(AnimatedFrame::from_state(&state));
                    debug!(
                        animated = state.animated(),
                        phase = %state.phase(),
                        "progress animation settled for fade"
                    );
                    break;
                }
            }

            _ = ticker.tick() => {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                let previous = state.phase();
                state = estimator.advance(&state, watcher.latest(), now_ms);
                frames.send_replace(AnimatedFrame::from_state(&state));

                if state.phase() != previous {
                    trace!(from = %previous, to = %state.phase(), now_ms, "estimator phase change");
                }
                if state.is_done() {
                    debug!(elapsed_ms = now_ms, "progress animation complete");
                    break;
                }
            }
        }
    }

    state
}

/// Handle to a running animation.
///
/// Dropping the handle stops the animation.
pub struct AnimationHandle {
    frames: watch::Receiver<AnimatedFrame>,
    fading: watch::Sender<bool>,
    cancel: CancellationToken,
    task: Option<JoinHandle<EstimatorState>>,
}

impl AnimationHandle {
    /// A receiver for the frame feed.
    pub fn frames(&self) -> watch::Receiver<AnimatedFrame> {
        self.frames.clone()
    }

    /// The most recent frame.
    pub fn latest(&self) -> AnimatedFrame {
        *self.frames.borrow()
    }

    /// Stop ticking and settle: snap to done if loading finished, otherwise
    /// freeze at the current value.
    pub fn begin_fade(&self) {
        self.fading.send_replace(true);
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the animation to end and return its final state.
    ///
    /// Returns `None` if the task panicked or was aborted.
    pub async fn finished(mut self) -> Option<EstimatorState> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("latest", &self.latest())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
