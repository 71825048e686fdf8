//! Progress reporting for chunked loads.
//!
//! Two flavours of progress leave the pipeline:
//! - a [`ChunkReport`] passed to the caller's callback once per chunk
//! - the latest overall percentage, published through a `watch` channel so
//!   the estimator can poll it every frame without ever blocking

use std::sync::Arc;

use tokio::sync::watch;

/// Progress callback invoked once per completed chunk, in chunk order.
pub type ProgressCallback = Box<dyn Fn(ChunkReport) + Send + Sync>;

/// Snapshot emitted after each completed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkReport {
    /// Assets settled so far (successes and failures).
    pub loaded: usize,
    /// Assets in the run.
    pub total: usize,
    /// 1-based index of the chunk that just completed.
    pub chunk_index: usize,
}

impl ChunkReport {
    pub fn new(loaded: usize, total: usize, chunk_index: usize) -> Self {
        Self {
            loaded,
            total,
            chunk_index,
        }
    }

    /// Completion as a percentage in `[0, 100]`. An empty run is complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.loaded as f64 / self.total as f64 * 100.0).min(100.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Create a connected publisher/watcher pair starting at 0 %.
pub fn progress_channel() -> (ProgressPublisher, ProgressWatcher) {
    let (tx, rx) = watch::channel(0.0);
    (ProgressPublisher { tx: Arc::new(tx) }, ProgressWatcher { rx })
}

/// Sending half of the actual-progress feed. Clones publish to the same feed.
#[derive(Debug, Clone)]
pub struct ProgressPublisher {
    tx: Arc<watch::Sender<f64>>,
}

impl ProgressPublisher {
    /// Publish the latest actual percentage, clamped to `[0, 100]`.
    pub fn publish(&self, percent: f64) {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        self.tx.send_replace(percent);
    }

    /// Publish a chunk report as a percentage.
    pub fn publish_report(&self, report: &ChunkReport) {
        self.publish(report.percent());
    }

    /// Create another watcher on the same feed.
    pub fn subscribe(&self) -> ProgressWatcher {
        ProgressWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving half of the actual-progress feed.
#[derive(Debug, Clone)]
pub struct ProgressWatcher {
    rx: watch::Receiver<f64>,
}

impl ProgressWatcher {
    /// The most recently published percentage. Never blocks.
    pub fn latest(&self) -> f64 {
        *self.rx.borrow()
    }

    /// Wait until a new value is published.
    ///
    /// Returns `false` once the publisher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_report_percent() {
        assert!((ChunkReport::new(3, 9, 1).percent() - 33.333).abs() < 0.001);
        assert_eq!(ChunkReport::new(9, 9, 3).percent(), 100.0);
        assert!(ChunkReport::new(9, 9, 3).is_complete());
        assert!(!ChunkReport::new(6, 9, 2).is_complete());
    }

    #[test]
    fn test_empty_run_is_complete() {
        let report = ChunkReport::new(0, 0, 0);
        assert_eq!(report.percent(), 100.0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_publish_clamps() {
        let (publisher, watcher) = progress_channel();
        assert_eq!(watcher.latest(), 0.0);

        publisher.publish(42.5);
        assert_eq!(watcher.latest(), 42.5);

        publisher.publish(150.0);
        assert_eq!(watcher.latest(), 100.0);

        publisher.publish(-3.0);
        assert_eq!(watcher.latest(), 0.0);

        publisher.publish(f64::NAN);
        assert_eq!(watcher.latest(), 0.0);
    }

    #[test]
    fn test_publish_report() {
        let (publisher, watcher) = progress_channel();
        publisher.publish_report(&ChunkReport::new(1, 4, 1));
        assert_eq!(watcher.latest(), 25.0);
    }

    #[tokio::test]
    async fn test_subscriber_sees_updates() {
        let (publisher, _watcher) = progress_channel();
        let mut second = publisher.subscribe();

        publisher.publish(10.0);
        assert!(second.changed().await);
        assert_eq!(second.latest(), 10.0);

        drop(publisher);
        assert!(!second.changed().await);
    }

    #[test]
    fn test_cloned_publishers_share_feed() {
        let (publisher, watcher) = progress_channel();
        let clone = publisher.clone();

        clone.publish(60.0);
        assert_eq!(watcher.latest(), 60.0);
        publisher.publish(70.0);
        assert_eq!(watcher.latest(), 70.0);
    }
}
