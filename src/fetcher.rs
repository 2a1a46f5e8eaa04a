//! Source page download.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: Core trait; turns a URL into raw HTML
//! - [`HttpFetcher`]: `reqwest`-backed implementation used by the binary
//!
//! There is no retry layer. Any failure is returned as-is and ends the run;
//! rescheduling is left to whatever invokes the binary.

use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Errors raised while fetching the source page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout, body decoding)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {status} from {url}")]
    HttpStatus { status: u16, url: String },
}

/// Trait for downloading a page as text.
pub trait PageFetcher {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`PageFetcher`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with a crate-named `User-Agent` and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Source page returned an error status");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        info!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source page"
        );
        debug!(preview = %truncate_for_log(&body, 200), "Source page body");
        Ok(body)
    }
}
