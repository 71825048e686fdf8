//! Best-effort byte size detection.
//!
//! Size detection is a chain of [`SizeProbe`]s tried in order; the first
//! probe to report a non-zero size wins. When every tier comes up empty the
//! size is reported as `0` (unknown), which is not an error.
//!
//! ```text
//! ProbeChain
//!     ├── TimingProbe         (resource timing record)
//!     ├── DelayedTimingProbe  (short wait, then the timing record again)
//!     └── HeadRequestProbe    (metadata-only request, Content-Length)
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use super::fetch::AssetFetcher;
use super::timing::ResourceTimings;

/// Default wait before re-checking the timing record.
pub const DEFAULT_PROBE_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Boxed future returned by [`SizeProbe::probe`].
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = Option<u64>> + Send + 'a>>;

/// One tier of the size-detection chain.
pub trait SizeProbe: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Try to determine the byte size of `locator`.
    fn probe<'a>(&'a self, locator: &'a str) -> ProbeFuture<'a>;
}

/// Tier 1: read the passive resource timing record.
#[derive(Debug, Clone)]
pub struct TimingProbe {
    timings: Arc<ResourceTimings>,
}

impl TimingProbe {
    pub fn new(timings: Arc<ResourceTimings>) -> Self {
        Self { timings }
    }
}

impl SizeProbe for TimingProbe {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn probe<'a>(&'a self, locator: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move { self.timings.size_for(locator) })
    }
}

/// Tier 2: wait briefly, then read the timing record again.
///
/// Timing records can be populated after the fetch itself resolved.
#[derive(Debug, Clone)]
pub struct DelayedTimingProbe {
    timings: Arc<ResourceTimings>,
    delay: Duration,
}

impl DelayedTimingProbe {
    pub fn new(timings: Arc<ResourceTimings>, delay: Duration) -> Self {
        Self { timings, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl SizeProbe for DelayedTimingProbe {
    fn name(&self) -> &'static str {
        "timing-retry"
    }

    fn probe<'a>(&'a self, locator: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.timings.size_for(locator)
        })
    }
}

/// Tier 3: issue a metadata-only request and read its advertised length.
pub struct HeadRequestProbe<F> {
    fetcher: Arc<F>,
}

impl<F> HeadRequestProbe<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }
}

impl<F: AssetFetcher> SizeProbe for HeadRequestProbe<F> {
    fn name(&self) -> &'static str {
        "head"
    }

    fn probe<'a>(&'a self, locator: &'a str) -> ProbeFuture<'a> {
        Box::pin(self.fetcher.content_length(locator))
    }
}

/// Ordered chain of size probes.
#[derive(Default)]
pub struct ProbeChain {
    probes: Vec<Box<dyn SizeProbe>>,
}

impl ProbeChain {
    /// Create an empty chain. An empty chain always reports `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard three-tier chain.
    ///
    /// # Arguments
    ///
    /// * `timings` - Timing record shared with the transport
    /// * `fetcher` - Transport used for the metadata-only request
    /// * `retry_delay` - Wait before re-checking the timing record
    /// * `head_probe` - Whether to include the metadata-only request tier
    pub fn standard<F: AssetFetcher + 'static>(
        timings: Arc<ResourceTimings>,
        fetcher: Arc<F>,
        retry_delay: Duration,
        head_probe: bool,
    ) -> Self {
        let chain = Self::new()
            .with(TimingProbe::new(Arc::clone(&timings)))
            .with(DelayedTimingProbe::new(timings, retry_delay));

        if head_probe {
            chain.with(HeadRequestProbe::new(fetcher))
        } else {
            chain
        }
    }

    /// Append a probe to the end of the chain.
    pub fn with(mut self, probe: impl SizeProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Names of the probes in chain order.
    pub fn names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Run the chain for `locator`, returning `0` if no tier yields a size.
    pub async fn detect(&self, locator: &str) -> u64 {
        for probe in &self.probes {
            match probe.probe(locator).await {
                Some(size) if size > 0 => {
                    trace!(locator, probe = probe.name(), size, "size detected");
                    return size;
                }
                _ => trace!(locator, probe = probe.name(), "size probe yielded nothing"),
            }
        }
        0
    }
}

impl std::fmt::Debug for ProbeChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeChain")
            .field("probes", &self.names())
            .finish()
    }
}
