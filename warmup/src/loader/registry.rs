//! Registry of assets that are already decoded and available.
//!
//! The loader consults the registry before touching the network so that an
//! asset requested twice is only fetched once.

use dashmap::DashMap;

use super::types::Dimensions;
use crate::asset::AssetRef;

/// Lookup of already-decoded assets.
///
/// Equivalence is by locator: a module handle and a plain locator that
/// resolve to the same URL are the same resource.
pub trait DecodedRegistry: Send + Sync {
    /// Dimensions of `asset` if it is already decoded.
    fn lookup(&self, asset: &AssetRef) -> Option<Dimensions>;

    /// Record that `asset` has been decoded with `dimensions`.
    fn record(&self, asset: &AssetRef, dimensions: Dimensions);

    /// Whether `asset` is already decoded.
    fn has_decoded(&self, asset: &AssetRef) -> bool {
        self.lookup(asset).is_some()
    }
}

/// In-memory decoded registry.
#[derive(Debug, Default)]
pub struct DecodedCache {
    entries: DashMap<String, Dimensions>,
}

impl DecodedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DecodedRegistry for DecodedCache {
    fn lookup(&self, asset: &AssetRef) -> Option<Dimensions> {
        self.entries.get(asset.as_locator()).map(|d| *d)
    }

    fn record(&self, asset: &AssetRef, dimensions: Dimensions) {
        self.entries.insert(asset.as_locator().to_string(), dimensions);
    }
}

/// Registry that never reports anything as decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRegistry;

impl DecodedRegistry for NoRegistry {
    fn lookup(&self, _asset: &AssetRef) -> Option<Dimensions> {
        None
    }

    fn record(&self, _asset: &AssetRef, _dimensions: Dimensions) {}
}
