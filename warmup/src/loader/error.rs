//! Error types for the asset loader.

use thiserror::Error;

use crate::asset::AssetRef;

/// Errors raised by an [`AssetFetcher`](super::AssetFetcher).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Why a single asset failed to load.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FailureReason {
    /// The resource could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The fetched bytes are not a decodable image.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The decode task was aborted before it finished.
    #[error("decode task aborted: {0}")]
    Aborted(String),
}

/// One asset could not be decoded at all.
///
/// Recovered locally by the chunk scheduler: the asset still counts toward
/// progress and the failure is surfaced as a diagnostic.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("failed to load {handle}: {reason}")]
pub struct LoadFailure {
    pub handle: AssetRef,
    pub reason: FailureReason,
}

impl LoadFailure {
    pub fn new(handle: AssetRef, reason: impl Into<FailureReason>) -> Self {
        Self {
            handle,
            reason: reason.into(),
        }
    }

    /// Whether the failure happened at the transport layer.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self.reason, FailureReason::Fetch(_))
    }
}
