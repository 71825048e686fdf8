//! Passive resource timing records.
//!
//! The transport records one [`TimingEntry`] per completed fetch, keyed by
//! the requested URL. Entries may appear some time after the fetch resolved,
//! which is why size detection re-checks this store after a short delay.

use std::time::Duration;

use dashmap::DashMap;

/// Measurement of one completed network transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingEntry {
    /// Bytes transferred over the wire (0 if unknown).
    pub transfer_size: u64,
    /// Size of the response body after content decoding (0 if unknown).
    pub decoded_body_size: u64,
    /// Time from request start to the end of the body.
    pub duration: Duration,
}

impl TimingEntry {
    /// The best size this entry offers, preferring the transfer size.
    pub fn size(&self) -> Option<u64> {
        if self.transfer_size > 0 {
            Some(self.transfer_size)
        } else if self.decoded_body_size > 0 {
            Some(self.decoded_body_size)
        } else {
            None
        }
    }
}

/// Concurrent store of timing entries keyed by resource name.
#[derive(Debug, Default)]
pub struct ResourceTimings {
    entries: DashMap<String, TimingEntry>,
}

impl ResourceTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the entry for `name`.
    pub fn record(&self, name: impl Into<String>, entry: TimingEntry) {
        self.entries.insert(name.into(), entry);
    }

    /// Find the size recorded for `locator`.
    ///
    /// Matches the exact name first, then any entry whose name ends with the
    /// locator so relative locators still find absolute entries.
    pub fn size_for(&self, locator: &str) -> Option<u64> {
        if let Some(entry) = self.entries.get(locator) {
            return entry.size();
        }

        if locator.is_empty() {
            return None;
        }

        // Several absolute entries can end with the same relative locator;
        // the lexicographically first key wins so the answer is stable.
        self.entries
            .iter()
            .filter(|e| suffix_on_segment(e.key(), locator))
            .min_by(|a, b| a.key().cmp(b.key()))
            .and_then(|e| e.value().size())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Whether `locator` is a suffix of `name` that starts on a path segment.
fn suffix_on_segment(name: &str, locator: &str) -> bool {
    if !name.ends_with(locator) {
        return false;
    }
    if locator.starts_with('/') {
        return true;
    }
    let start = name.len() - locator.len();
    start > 0 && name.as_bytes()[start - 1] == b'/'
}
