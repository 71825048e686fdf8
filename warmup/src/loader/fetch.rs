//! Transport abstraction for fetching image bytes.
//!
//! The loader never talks to the network directly; it goes through an
//! [`AssetFetcher`], which allows mock transports in tests.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::CONTENT_LENGTH;
use tracing::{debug, trace, warn};

use super::error::FetchError;
use super::timing::{ResourceTimings, TimingEntry};
use crate::asset::Priority;

/// Default timeout for a single fetch in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("warmup/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous asset transport.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the full body of `locator`.
    ///
    /// # Arguments
    ///
    /// * `locator` - The resource to fetch
    /// * `priority` - Hint for the transport; see [`Priority::header_value`]
    fn fetch(
        &self,
        locator: &str,
        priority: Priority,
    ) -> impl Future<Output = Result<Bytes, FetchError>> + Send;

    /// Issue a metadata-only request and return the advertised body size.
    ///
    /// Returns `None` if the request fails or no length is advertised.
    fn content_length(&self, locator: &str) -> impl Future<Output = Option<u64>> + Send;
}

/// HTTP transport backed by an async reqwest client.
///
/// When built with [`ReqwestFetcher::with_timings`], every successful fetch
/// is recorded into the shared [`ResourceTimings`] store.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    timeout: Duration,
    timings: Option<Arc<ResourceTimings>>,
}

impl ReqwestFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            timings: None,
        })
    }

    /// Record timing entries for completed fetches into `timings`.
    pub fn with_timings(mut self, timings: Arc<ResourceTimings>) -> Self {
        self.timings = Some(timings);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl AssetFetcher for ReqwestFetcher {
    async fn fetch(&self, locator: &str, priority: Priority) -> Result<Bytes, FetchError> {
        trace!(locator, %priority, "fetch starting");

        let mut request = self.client.get(locator);
        if let Some(hint) = priority.header_value() {
            request = request.header("Priority", hint);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(
                locator,
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "fetch failed"
            );
            self.map_error(locator, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(locator, status = status.as_u16(), "fetch returned error status");
            return Err(FetchError::Status {
                url: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let transfer_size = response.content_length().unwrap_or(0);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(locator, e))?;

        if let Some(timings) = &self.timings {
            timings.record(
                locator,
                TimingEntry {
                    transfer_size,
                    decoded_body_size: body.len() as u64,
                    duration: started.elapsed(),
                },
            );
        }

        debug!(
            locator,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetch complete"
        );
        Ok(body)
    }

    async fn content_length(&self, locator: &str) -> Option<u64> {
        let response = self
            .client
            .head(locator)
            .send()
            .await
            .ok()
            .filter(|r| r.status().is_success())?;

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    }
}
