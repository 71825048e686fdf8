//! Single-asset loader.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use super::decode::decode_in_background;
use super::error::LoadFailure;
use super::fetch::AssetFetcher;
use super::probe::ProbeChain;
use super::registry::{DecodedRegistry, NoRegistry};
use super::timing::ResourceTimings;
use super::types::LoadResult;
use crate::asset::{AssetRef, Priority};

/// Loads one image asset: fetch, decode, then best-effort size detection.
///
/// Assets already present in the [`DecodedRegistry`] resolve immediately
/// with an unknown (`0`) byte size and no network work.
pub struct AssetLoader<F> {
    fetcher: Arc<F>,
    registry: Arc<dyn DecodedRegistry>,
    probes: ProbeChain,
}

impl<F: AssetFetcher + 'static> AssetLoader<F> {
    /// Create a loader from its parts.
    pub fn new(fetcher: Arc<F>, registry: Arc<dyn DecodedRegistry>, probes: ProbeChain) -> Self {
        Self {
            fetcher,
            registry,
            probes,
        }
    }

    /// Create a loader with the standard three-tier size probe chain.
    pub fn with_standard_probes(
        fetcher: Arc<F>,
        registry: Arc<dyn DecodedRegistry>,
        timings: Arc<ResourceTimings>,
        retry_delay: Duration,
    ) -> Self {
        let probes = ProbeChain::standard(timings, Arc::clone(&fetcher), retry_delay, true);
        Self::new(fetcher, registry, probes)
    }

    /// Create a loader with no registry and no size probes.
    pub fn bare(fetcher: Arc<F>) -> Self {
        Self::new(fetcher, Arc::new(NoRegistry), ProbeChain::new())
    }

    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    pub fn registry(&self) -> &Arc<dyn DecodedRegistry> {
        &self.registry
    }

    pub fn probes(&self) -> &ProbeChain {
        &self.probes
    }

    /// Load `asset`.
    ///
    /// Fails only if the resource cannot be fetched or decoded. The primary
    /// load is never retried; size detection may issue one extra
    /// metadata-only request.
    pub async fn load(&self, asset: &AssetRef, priority: Priority) -> Result<LoadResult, LoadFailure> {
        let started = Instant::now();
        let locator = asset.as_locator();

        if let Some(dimensions) = self.registry.lookup(asset) {
            trace!(locator, %dimensions, "already decoded, skipping fetch");
            return Ok(LoadResult {
                handle: asset.clone(),
                byte_size: 0,
                dimensions,
                load_time: started.elapsed(),
            });
        }

        let bytes = self
            .fetcher
            .fetch(locator, priority)
            .await
            .map_err(|e| LoadFailure::new(asset.clone(), e))?;

        let dimensions = decode_in_background(bytes)
            .await
            .map_err(|reason| LoadFailure::new(asset.clone(), reason))?;
        let load_time = started.elapsed();

        self.registry.record(asset, dimensions);

        let byte_size = self.probes.detect(locator).await;

        debug!(
            locator,
            %dimensions,
            bytes = byte_size,
            elapsed_ms = load_time.as_millis() as u64,
            "asset loaded"
        );

        Ok(LoadResult {
            handle: asset.clone(),
            byte_size,
            dimensions,
            load_time,
        })
    }
}

impl<F> std::fmt::Debug for AssetLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("probes", &self.probes)
            .finish_non_exhaustive()
    }
}
