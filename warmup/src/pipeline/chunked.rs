//! Chunked, bounded-concurrency loading of an asset list.
//!
//! Assets are split into consecutive chunks. Each chunk is loaded as a
//! fan-out/join: every load in the chunk starts at once and the chunk ends
//! when all of them have settled. A failed load never cancels its siblings
//! and still counts toward progress. An optional pause between chunks keeps
//! a long list from saturating the network in one burst.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::progress::{ChunkReport, ProgressCallback};
use super::stats::PipelineStats;
use crate::asset::{AssetRef, Priority};
use crate::loader::{AssetFetcher, AssetLoader, LoadFailure, LoadResult};

/// Default number of assets loaded concurrently per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4;

/// Default pause between chunks.
pub const DEFAULT_INTER_CHUNK_DELAY: Duration = Duration::from_millis(50);

/// Per-asset outcome of a run, tagged success or failure.
pub type TaggedResult = Result<LoadResult, LoadFailure>;

/// Options for one chunked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Assets per chunk (minimum 1).
    pub chunk_size: usize,
    /// Priority hint for every load in the run.
    pub priority: Priority,
    /// Pause between chunks. Zero disables the pause.
    pub inter_chunk_delay: Duration,
}

impl ChunkOptions {
    /// Create options, clamping `chunk_size` to at least 1.
    pub fn new(chunk_size: usize, priority: Priority, inter_chunk_delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            priority,
            inter_chunk_delay,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_inter_chunk_delay(mut self, delay: Duration) -> Self {
        self.inter_chunk_delay = delay;
        self
    }

    /// Number of chunks needed for `total` assets.
    pub fn chunk_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size.max(1))
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, Priority::Auto, DEFAULT_INTER_CHUNK_DELAY)
    }
}

/// Result of a chunked run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// One entry per attempted asset, in input order.
    pub results: Vec<TaggedResult>,
    /// Totals over the successful loads.
    pub stats: PipelineStats,
    /// Assets settled (successes and failures).
    pub loaded: usize,
    /// Assets in the run.
    pub total: usize,
    /// Chunks that ran to completion.
    pub chunks_completed: usize,
    /// Whether the run stopped early because it was cancelled.
    pub cancelled: bool,
}

impl PipelineOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// Iterate over the failed loads.
    pub fn failures(&self) -> impl Iterator<Item = &LoadFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Whether every asset was attempted.
    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }
}

/// Loads asset lists chunk by chunk through a shared [`AssetLoader`].
pub struct ChunkScheduler<F> {
    loader: Arc<AssetLoader<F>>,
    options: ChunkOptions,
}

impl<F: AssetFetcher + 'static> ChunkScheduler<F> {
    pub fn new(loader: Arc<AssetLoader<F>>, options: ChunkOptions) -> Self {
        Self {
            loader,
            options: ChunkOptions {
                chunk_size: options.chunk_size.max(1),
                ..options
            },
        }
    }

    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    pub fn loader(&self) -> &Arc<AssetLoader<F>> {
        &self.loader
    }

    /// Load every asset in `assets`.
    ///
    /// Always completes; per-asset failures are carried in the results and
    /// never returned as an error. `on_progress` is called exactly once per
    /// chunk, in chunk order.
    pub async fn run(
        &self,
        assets: &[AssetRef],
        on_progress: Option<&ProgressCallback>,
    ) -> PipelineOutcome {
        self.run_until_cancelled(assets, on_progress, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but stops at the next chunk boundary or
    /// inter-chunk pause once `cancel` fires.
    ///
    /// Loads already in flight when cancellation happens are allowed to
    /// finish and are still recorded.
    pub async fn run_until_cancelled(
        &self,
        assets: &[AssetRef],
        on_progress: Option<&ProgressCallback>,
        cancel: &CancellationToken,
    ) -> PipelineOutcome {
        let total = assets.len();
        let ChunkOptions {
            chunk_size,
            priority,
            inter_chunk_delay,
        } = self.options;
        let chunk_count = self.options.chunk_count(total);

        info!(
            total,
            chunk_size,
            chunks = chunk_count,
            %priority,
            delay_ms = inter_chunk_delay.as_millis() as u64,
            "starting chunked load"
        );

        let mut stats = PipelineStats::new();
        let mut results = Vec::with_capacity(total);
        let mut loaded = 0;
        let mut chunks_completed = 0;
        let mut cancelled = false;

        for (i, chunk) in assets.chunks(chunk_size).enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let chunk_index = i + 1;
            let settled = join_all(chunk.iter().map(|asset| self.loader.load(asset, priority))).await;

            for result in settled {
                loaded += 1;
                match &result {
                    Ok(loaded_asset) => stats.record(loaded_asset),
                    Err(failure) => warn!(
                        chunk = chunk_index,
                        error = %failure,
                        "asset failed to load, counting it toward progress"
                    ),
                }
                results.push(result);
            }
            chunks_completed += 1;

            let report = ChunkReport::new(loaded, total, chunk_index);
            debug!(chunk = chunk_index, loaded, total, "chunk complete");
            if let Some(callback) = on_progress {
                callback(report);
            }

            let is_last = chunk_index == chunk_count;
            if !is_last && !inter_chunk_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(inter_chunk_delay) => {}
                }
            }
        }

        if cancelled {
            info!(loaded, total, "chunked load cancelled");
        } else {
            info!(
                loaded,
                total,
                bytes = stats.total_size,
                load_ms = stats.total_load_time.as_millis() as u64,
                "chunked load complete"
            );
        }

        PipelineOutcome {
            results,
            stats,
            loaded,
            total,
            chunks_completed,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DecodedCache, MockFetcher, ResourceTimings};
    use proptest::prelude::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn assets(n: usize) -> Vec<AssetRef> {
        (0..n)
            .map(|i| AssetRef::locator(format!("/img/{}.png", i)))
            .collect()
    }

    fn serving_all(n: usize) -> MockFetcher {
        (0..n).fold(MockFetcher::new(), |mock, i| {
            mock.with_image(&format!("/img/{}.png", i), 4, 4)
        })
    }

    fn scheduler(fetcher: MockFetcher, options: ChunkOptions) -> ChunkScheduler<MockFetcher> {
        ChunkScheduler::new(Arc::new(AssetLoader::bare(Arc::new(fetcher))), options)
    }

    fn recording_callback() -> (ProgressCallback, Arc<Mutex<Vec<ChunkReport>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let callback: ProgressCallback = Box::new(move |report| {
            sink.lock().unwrap().push(report);
        });
        (callback, reports)
    }

    #[test]
    fn test_options_clamp_chunk_size() {
        let options = ChunkOptions::new(0, Priority::Auto, Duration::ZERO);
        assert_eq!(options.chunk_size, 1);
        assert_eq!(options.chunk_count(5), 5);
    }

    #[test]
    fn test_options_default() {
        let options = ChunkOptions::default();
        assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(options.priority, Priority::Auto);
        assert_eq!(options.inter_chunk_delay, DEFAULT_INTER_CHUNK_DELAY);
    }

    #[tokio::test]
    async fn test_nine_assets_in_chunks_of_three() {
        let scheduler = scheduler(
            serving_all(9),
            ChunkOptions::new(3, Priority::Auto, Duration::ZERO),
        );
        let (callback, reports) = recording_callback();

        let outcome = scheduler.run(&assets(9), Some(&callback)).await;

        assert_eq!(
            *reports.lock().unwrap(),
            vec![
                ChunkReport::new(3, 9, 1),
                ChunkReport::new(6, 9, 2),
                ChunkReport::new(9, 9, 3),
            ]
        );
        assert_eq!(outcome.succeeded(), 9);
        assert_eq!(outcome.chunks_completed, 3);
        assert!(outcome.is_complete());
        assert!(!outcome.cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_in_chunk_still_counts() {
        let fetcher = MockFetcher::new()
            .with_image("/img/0.png", 4, 4)
            .with_head_size("/img/0.png", 1000)
            .with_body("/img/1.png", b"not an image")
            .with_image("/img/2.png", 4, 4)
            .with_head_size("/img/2.png", 3000);
        let loader = AssetLoader::with_standard_probes(
            Arc::new(fetcher),
            Arc::new(DecodedCache::new()),
            Arc::new(ResourceTimings::new()),
            Duration::from_millis(10),
        );
        let scheduler = ChunkScheduler::new(
            Arc::new(loader),
            ChunkOptions::new(3, Priority::Auto, Duration::ZERO),
        );
        let (callback, reports) = recording_callback();

        let outcome = scheduler.run(&assets(3), Some(&callback)).await;

        assert_eq!(*reports.lock().unwrap(), vec![ChunkReport::new(3, 3, 1)]);
        assert_eq!(outcome.loaded, 3);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.stats.recorded, 2);
        assert_eq!(outcome.stats.total_size, 4000);
        assert_eq!(outcome.stats.largest_size(), 3000);
        assert_eq!(
            outcome.failures().next().unwrap().handle,
            AssetRef::locator("/img/1.png")
        );
    }

    #[tokio::test]
    async fn test_all_failures_still_complete() {
        let scheduler = scheduler(
            MockFetcher::new(),
            ChunkOptions::new(2, Priority::Auto, Duration::ZERO),
        );
        let (callback, reports) = recording_callback();

        let outcome = scheduler.run(&assets(5), Some(&callback)).await;

        assert_eq!(reports.lock().unwrap().len(), 3);
        assert_eq!(reports.lock().unwrap().last().unwrap().loaded, 5);
        assert_eq!(outcome.failed(), 5);
        assert_eq!(outcome.stats, PipelineStats::new());
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let scheduler = scheduler(
            serving_all(5),
            ChunkOptions::new(2, Priority::Auto, Duration::ZERO),
        );
        let list = assets(5);

        let outcome = scheduler.run(&list, None).await;

        let handles: Vec<_> = outcome
            .results
            .iter()
            .map(|r| r.as_ref().unwrap().handle.clone())
            .collect();
        assert_eq!(handles, list);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let scheduler = scheduler(MockFetcher::new(), ChunkOptions::default());
        let (callback, reports) = recording_callback();

        let outcome = scheduler.run(&[], Some(&callback)).await;

        assert!(reports.lock().unwrap().is_empty());
        assert!(outcome.is_complete());
        assert_eq!(outcome.chunks_completed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bounded_by_chunk_size() {
        let fetcher = (0..6).fold(MockFetcher::new(), |mock, i| {
            mock.with_delayed_image(&format!("/img/{}.png", i), 2, 2, Duration::from_millis(100))
        });
        let scheduler = scheduler(fetcher, ChunkOptions::new(2, Priority::Low, Duration::ZERO));

        scheduler.run(&assets(6), None).await;

        let fetcher = scheduler.loader().fetcher();
        assert_eq!(fetcher.max_in_flight(), 2);
        assert!(fetcher.log().iter().all(|(_, p)| *p == Priority::Low));
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunks_are_sequential_with_delay() {
        let fetcher = (0..4).fold(MockFetcher::new(), |mock, i| {
            mock.with_delayed_image(&format!("/img/{}.png", i), 2, 2, Duration::from_millis(100))
        });
        let scheduler = scheduler(
            fetcher,
            ChunkOptions::new(2, Priority::Auto, Duration::from_millis(500)),
        );
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stamps);
        let callback: ProgressCallback = Box::new(move |_| sink.lock().unwrap().push(Instant::now()));

        let started = Instant::now();
        scheduler.run(&assets(4), Some(&callback)).await;
        let elapsed = started.elapsed();

        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] - stamps[0] >= Duration::from_millis(600));
        // No pause after the last chunk.
        assert!(elapsed < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_adds_no_pause() {
        let fetcher = (0..4).fold(MockFetcher::new(), |mock, i| {
            mock.with_delayed_image(&format!("/img/{}.png", i), 2, 2, Duration::from_millis(100))
        });
        let scheduler = scheduler(fetcher, ChunkOptions::new(2, Priority::Auto, Duration::ZERO));
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stamps);
        let callback: ProgressCallback = Box::new(move |_| sink.lock().unwrap().push(Instant::now()));

        let started = Instant::now();
        let outcome = scheduler.run(&assets(4), Some(&callback)).await;
        let elapsed = started.elapsed();

        assert_eq!(outcome.loaded, 4);
        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 2);
        // The second chunk starts as soon as the first settles.
        assert!(stamps[1] - stamps[0] < Duration::from_millis(150));
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_pause_stops_run() {
        let scheduler = scheduler(
            serving_all(6),
            ChunkOptions::new(2, Priority::Auto, Duration::from_secs(5)),
        );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let callback: ProgressCallback = Box::new(move |_| trigger.cancel());

        let outcome = scheduler
            .run_until_cancelled(&assets(6), Some(&callback), &cancel)
            .await;

        assert!(outcome.cancelled);
        assert_eq!(outcome.chunks_completed, 1);
        assert_eq!(outcome.loaded, 2);
        assert!(!outcome.is_complete());
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let scheduler = scheduler(serving_all(3), ChunkOptions::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = scheduler.run_until_cancelled(&assets(3), None, &cancel).await;

        assert!(outcome.cancelled);
        assert_eq!(outcome.loaded, 0);
        assert_eq!(scheduler.loader().fetcher().fetch_calls(), 0);
    }

    proptest! {
        /// One progress call per chunk, ending at the full count.
        #[test]
        fn prop_one_report_per_chunk(n in 0usize..24, k in 1usize..7, fail_every in 1usize..5) {
            let fetcher = (0..n)
                .filter(|i| i % fail_every != 0)
                .fold(MockFetcher::new(), |mock, i| {
                    mock.with_image(&format!("/img/{}.png", i), 1, 1)
                });
            let scheduler = scheduler(fetcher, ChunkOptions::new(k, Priority::Auto, Duration::ZERO));
            let (callback, reports) = recording_callback();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let outcome = runtime.block_on(scheduler.run(&assets(n), Some(&callback)));

            let reports = reports.lock().unwrap();
            prop_assert_eq!(reports.len(), n.div_ceil(k));
            prop_assert_eq!(outcome.loaded, n);
            if let Some(last) = reports.last() {
                prop_assert_eq!(last.loaded, n);
                prop_assert_eq!(last.total, n);
            }
            for pair in reports.windows(2) {
                prop_assert!(pair[0].loaded <= pair[1].loaded);
                prop_assert_eq!(pair[0].chunk_index + 1, pair[1].chunk_index);
            }
        }
    }
}
