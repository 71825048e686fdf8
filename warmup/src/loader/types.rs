//! Result types produced by the asset loader.

use std::fmt;
use std::time::Duration;

use crate::asset::AssetRef;

/// Decoded pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Outcome of successfully loading and decoding one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// The asset that was loaded.
    pub handle: AssetRef,
    /// Best-effort byte size. `0` means unknown.
    pub byte_size: u64,
    /// Decoded dimensions.
    pub dimensions: Dimensions,
    /// Time from starting the fetch to a completed decode.
    pub load_time: Duration,
}

impl LoadResult {
    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Whether the byte size could be determined.
    pub fn has_known_size(&self) -> bool {
        self.byte_size > 0
    }
}
