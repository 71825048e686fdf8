//! Tiered warm-up sessions.
//!
//! A session runs a [`WarmupPlan`] tier by tier through the chunk scheduler,
//! critical assets first, and publishes one overall actual-progress value
//! for the whole plan.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::catalog::{AssetTier, WarmupPlan};
use crate::config::LoaderSettings;
use crate::loader::{AssetFetcher, AssetLoader};
use crate::asset::Priority;
use crate::pipeline::{
    ChunkOptions, ChunkScheduler, PipelineOutcome, PipelineStats, ProgressCallback,
    ProgressPublisher,
};

/// Outcome of one tier.
#[derive(Debug, Clone)]
pub struct TierReport {
    pub tier: AssetTier,
    pub outcome: PipelineOutcome,
}

/// Outcome of a whole session.
#[derive(Debug, Clone, Default)]
pub struct WarmupReport {
    /// Tiers that started, in run order.
    pub tiers: Vec<TierReport>,
    /// Stats merged across all tiers.
    pub stats: PipelineStats,
    /// Assets settled across all tiers.
    pub loaded: usize,
    /// Assets in the plan.
    pub total: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl WarmupReport {
    pub fn succeeded(&self) -> usize {
        self.tiers.iter().map(|t| t.outcome.succeeded()).sum()
    }

    pub fn failed(&self) -> usize {
        self.tiers.iter().map(|t| t.outcome.failed()).sum()
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.loaded == self.total
    }

    pub fn tier(&self, tier: AssetTier) -> Option<&TierReport> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

/// Runs warm-up plans against a shared loader.
pub struct WarmupSession<F> {
    loader: Arc<AssetLoader<F>>,
    /// Chunking for every tier; the priority is replaced per tier.
    options: ChunkOptions,
}

impl<F: AssetFetcher + 'static> WarmupSession<F> {
    pub fn new(loader: Arc<AssetLoader<F>>) -> Self {
        Self {
            loader,
            options: ChunkOptions::default(),
        }
    }

    /// Use chunk size and pause from loader settings.
    pub fn from_settings(loader: Arc<AssetLoader<F>>, settings: &LoaderSettings) -> Self {
        Self {
            loader,
            options: settings.chunk_options(Priority::Auto),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_inter_chunk_delay(mut self, delay: Duration) -> Self {
        self.options = self.options.with_inter_chunk_delay(delay);
        self
    }

    pub fn options(&self) -> ChunkOptions {
        self.options
    }

    pub fn loader(&self) -> &Arc<AssetLoader<F>> {
        &self.loader
    }

    /// Run every tier of `plan` in order.
    ///
    /// After each chunk, `publisher` receives the share of the whole plan
    /// settled so far. An empty plan publishes 100 immediately. Cancellation
    /// stops at the next chunk boundary; tiers not yet started are skipped.
    pub async fn run(
        &self,
        plan: &WarmupPlan,
        publisher: &ProgressPublisher,
        cancel: &CancellationToken,
    ) -> WarmupReport {
        let started = Instant::now();
        let total = plan.total();

        if total == 0 {
            publisher.publish(100.0);
            info!("warm-up plan is empty, nothing to load");
            return WarmupReport::default();
        }

        info!(
            total,
            tiers = plan.tiers().len(),
            chunk_size = self.options.chunk_size,
            "starting warm-up"
        );

        let mut report = WarmupReport {
            total,
            ..WarmupReport::default()
        };

        for planned in plan.tiers() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let options = self.options.with_priority(planned.priority());
            let scheduler = ChunkScheduler::new(Arc::clone(&self.loader), options);

            let offset = report.loaded;
            let tier_publisher = publisher.clone();
            let on_progress: ProgressCallback = Box::new(move |chunk| {
                tier_publisher.publish(overall_percent(offset + chunk.loaded, total));
            });

            info!(tier = %planned.tier, assets = planned.assets.len(), "loading tier");
            let outcome = scheduler
                .run_until_cancelled(&planned.assets, Some(&on_progress), cancel)
                .await;

            report.loaded += outcome.loaded;
            report.stats.merge(&outcome.stats);
            report.cancelled |= outcome.cancelled;
            report.tiers.push(TierReport {
                tier: planned.tier,
                outcome,
            });

            if report.cancelled {
                break;
            }
        }

        report.elapsed = started.elapsed();

        if report.cancelled {
            info!(
                loaded = report.loaded,
                total,
                "warm-up cancelled"
            );
        } else {
            publisher.publish(100.0);
            info!(
                loaded = report.loaded,
                failed = report.failed(),
                bytes = report.stats.total_size,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "warm-up complete"
            );
        }

        report
    }
}

fn overall_percent(loaded: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        loaded as f64 / total as f64 * 100.0
    }
}
