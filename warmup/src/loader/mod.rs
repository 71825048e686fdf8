//! Single-asset loading.
//!
//! This module provides everything needed to load one image asset:
//! - Transport abstraction with a reqwest implementation (`fetch`)
//! - Image decoding (`decode`)
//! - Already-decoded asset registry (`registry`)
//! - Passive resource timing records (`timing`)
//! - Best-effort byte size detection (`probe`)
//! - The loader itself (`asset_loader`)
//!
//! # Architecture
//!
//! ```text
//! AssetLoader
//!     │
//!     ├── DecodedRegistry (short-circuit for decoded assets)
//!     │       └── DecodedCache
//!     │
//!     ├── AssetFetcher (trait)
//!     │       └── ReqwestFetcher ──records──> ResourceTimings
//!     │
//!     └── ProbeChain
//!             ├── TimingProbe ───────────reads──> ResourceTimings
//!             ├── DelayedTimingProbe ────reads──> ResourceTimings
//!             └── HeadRequestProbe ──────uses───> AssetFetcher
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warmup::asset::{AssetRef, Priority};
//! use warmup::loader::{
//!     AssetLoader, DecodedCache, ReqwestFetcher, ResourceTimings, DEFAULT_PROBE_RETRY_DELAY,
//! };
//!
//! let timings = Arc::new(ResourceTimings::new());
//! let fetcher = Arc::new(ReqwestFetcher::new()?.with_timings(Arc::clone(&timings)));
//! let loader = AssetLoader::with_standard_probes(
//!     fetcher,
//!     Arc::new(DecodedCache::new()),
//!     timings,
//!     DEFAULT_PROBE_RETRY_DELAY,
//! );
//!
//! let hero = AssetRef::locator("https://cdn.example.com/hero.png");
//! let result = loader.load(&hero, Priority::High).await?;
//! println!("{} bytes, {}", result.byte_size, result.dimensions);
//! ```

mod asset_loader;
mod decode;
mod error;
mod fetch;
mod probe;
mod registry;
mod timing;
mod types;

pub use asset_loader::AssetLoader;
pub use decode::decode_dimensions;
pub use error::{FailureReason, FetchError, LoadFailure};
pub use fetch::{AssetFetcher, ReqwestFetcher, DEFAULT_TIMEOUT_SECS};
pub use probe::{
    DelayedTimingProbe, HeadRequestProbe, ProbeChain, ProbeFuture, SizeProbe, TimingProbe,
    DEFAULT_PROBE_RETRY_DELAY,
};
pub use registry::{DecodedCache, DecodedRegistry, NoRegistry};
pub use timing::{ResourceTimings, TimingEntry};
pub use types::{Dimensions, LoadResult};

#[cfg(test)]
pub use fetch::tests::{png_bytes, MockFetcher};
