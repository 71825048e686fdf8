//! Warmup - concurrent image warm-up with smoothed progress
//!
//! This library preloads image assets in bounded concurrent chunks and turns
//! the resulting coarse progress into a smooth, never-regressing value fit
//! for a loading indicator.
//!
//! - [`loader`]: fetch, decode and size one asset
//! - [`pipeline`]: chunked fan-out/join scheduling, stats and progress feed
//! - [`estimator`]: the perceived-progress state machine and its animator
//! - [`catalog`] / [`session`]: section manifests and tiered warm-up runs
//! - [`config`] / [`logging`]: INI configuration and tracing setup

pub mod asset;
pub mod catalog;
pub mod config;
pub mod estimator;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod session;

pub use asset::{AssetRef, ModuleHandle, Priority};
pub use catalog::{AssetCatalog, AssetTier, CatalogError, StaticCatalog, WarmupPlan};
pub use estimator::{advance_estimator, EstimatorPhase, EstimatorState};
pub use loader::{AssetLoader, LoadFailure, LoadResult};
pub use pipeline::{ChunkScheduler, PipelineStats};
pub use session::{WarmupReport, WarmupSession};
