//! Chunked asset loading pipeline.
//!
//! This module drives the single-asset loader over a whole list:
//! - Chunk partitioning, fan-out/join and backpressure (`chunked`)
//! - Running totals over successful loads (`stats`)
//! - Per-chunk reports and the actual-progress feed (`progress`)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warmup::pipeline::{ChunkOptions, ChunkScheduler, ProgressCallback};
//!
//! let scheduler = ChunkScheduler::new(loader, ChunkOptions::default());
//! let on_progress: ProgressCallback = Box::new(|report| {
//!     println!("{}/{} after chunk {}", report.loaded, report.total, report.chunk_index);
//! });
//!
//! let outcome = scheduler.run(&assets, Some(&on_progress)).await;
//! println!("{}", outcome.stats);
//! ```

mod chunked;
mod progress;
mod stats;

pub use chunked::{
    ChunkOptions, ChunkScheduler, PipelineOutcome, TaggedResult, DEFAULT_CHUNK_SIZE,
    DEFAULT_INTER_CHUNK_DELAY,
};
pub use progress::{
    progress_channel, ChunkReport, ProgressCallback, ProgressPublisher, ProgressWatcher,
};
pub use stats::{format_size, LargestAsset, PipelineStats, SlowestAsset};
