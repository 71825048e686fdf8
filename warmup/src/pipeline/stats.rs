//! Running totals over the assets loaded by one pipeline run.

use std::fmt;
use std::time::Duration;

use crate::asset::AssetRef;
use crate::loader::LoadResult;

/// The asset with the largest known byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargestAsset {
    pub size: u64,
    pub handle: AssetRef,
}

/// The asset that took longest to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlowestAsset {
    pub time: Duration,
    pub handle: AssetRef,
}

/// Aggregate statistics for one pipeline run.
///
/// Owned exclusively by the run that creates it. Only successful loads are
/// folded in; `largest` and `slowest` stay `None` until an asset with a
/// non-zero size or load time is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Sum of known byte sizes.
    pub total_size: u64,
    /// Sum of per-asset load times.
    pub total_load_time: Duration,
    /// Largest asset by byte size.
    pub largest: Option<LargestAsset>,
    /// Slowest asset by load time.
    pub slowest: Option<SlowestAsset>,
    /// Number of successful loads recorded.
    pub recorded: usize,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one successful load into the totals.
    pub fn record(&mut self, result: &LoadResult) {
        self.recorded += 1;
        self.total_size += result.byte_size;
        self.total_load_time += result.load_time;

        if result.byte_size > self.largest_size() {
            self.largest = Some(LargestAsset {
                size: result.byte_size,
                handle: result.handle.clone(),
            });
        }

        if result.load_time > self.slowest_time() {
            self.slowest = Some(SlowestAsset {
                time: result.load_time,
                handle: result.handle.clone(),
            });
        }
    }

    /// Combine the stats of another run into this one.
    pub fn merge(&mut self, other: &PipelineStats) {
        self.recorded += other.recorded;
        self.total_size += other.total_size;
        self.total_load_time += other.total_load_time;

        if let Some(largest) = &other.largest {
            if largest.size > self.largest_size() {
                self.largest = Some(largest.clone());
            }
        }

        if let Some(slowest) = &other.slowest {
            if slowest.time > self.slowest_time() {
                self.slowest = Some(slowest.clone());
            }
        }
    }

    /// Size of the largest asset, `0` if none is known.
    pub fn largest_size(&self) -> u64 {
        self.largest.as_ref().map_or(0, |l| l.size)
    }

    /// Load time of the slowest asset, zero if none is known.
    pub fn slowest_time(&self) -> Duration {
        self.slowest.as_ref().map_or(Duration::ZERO, |s| s.time)
    }

    /// Mean load time over recorded assets.
    pub fn average_load_time(&self) -> Option<Duration> {
        if self.recorded == 0 {
            None
        } else {
            Some(self.total_load_time / self.recorded as u32)
        }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} assets, {} total, {}ms total load time",
            self.recorded,
            format_size(self.total_size),
            self.total_load_time.as_millis()
        )
    }
}

/// Format a byte count for humans (`1.5 MB`, `512 B`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dimensions;

    fn result(locator: &str, size: u64, ms: u64) -> LoadResult {
        LoadResult {
            handle: AssetRef::locator(locator),
            byte_size: size,
            dimensions: Dimensions::new(1, 1),
            load_time: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = PipelineStats::new();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.largest, None);
        assert_eq!(stats.slowest, None);
        assert_eq!(stats.average_load_time(), None);
    }

    #[test]
    fn test_record_tracks_totals_and_extremes() {
        let mut stats = PipelineStats::new();
        stats.record(&result("/a", 100, 30));
        stats.record(&result("/b", 500, 10));
        stats.record(&result("/c", 200, 80));

        assert_eq!(stats.recorded, 3);
        assert_eq!(stats.total_size, 800);
        assert_eq!(stats.total_load_time, Duration::from_millis(120));
        assert_eq!(stats.largest_size(), 500);
        assert_eq!(stats.largest.as_ref().unwrap().handle, AssetRef::locator("/b"));
        assert_eq!(stats.slowest_time(), Duration::from_millis(80));
        assert_eq!(stats.slowest.as_ref().unwrap().handle, AssetRef::locator("/c"));
    }

    #[test]
    fn test_first_holder_kept_on_tie() {
        let mut stats = PipelineStats::new();
        stats.record(&result("/a", 100, 30));
        stats.record(&result("/b", 100, 30));

        assert_eq!(stats.largest.as_ref().unwrap().handle, AssetRef::locator("/a"));
        assert_eq!(stats.slowest.as_ref().unwrap().handle, AssetRef::locator("/a"));
    }

    #[test]
    fn test_zero_values_leave_extremes_unset() {
        let mut stats = PipelineStats::new();
        stats.record(&result("/a", 0, 0));

        assert_eq!(stats.recorded, 1);
        assert_eq!(stats.largest, None);
        assert_eq!(stats.slowest, None);
    }

    #[test]
    fn test_merge() {
        let mut first = PipelineStats::new();
        first.record(&result("/a", 100, 90));

        let mut second = PipelineStats::new();
        second.record(&result("/b", 300, 10));

        first.merge(&second);

        assert_eq!(first.recorded, 2);
        assert_eq!(first.total_size, 400);
        assert_eq!(first.largest.as_ref().unwrap().handle, AssetRef::locator("/b"));
        assert_eq!(first.slowest.as_ref().unwrap().handle, AssetRef::locator("/a"));
        assert_eq!(first.average_load_time(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }
}
