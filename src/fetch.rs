//! Remote payload retrieval
//!
//! One blocking GET with a fixed timeout. Retry, backoff and caching policy
//! belong to whatever schedules ingest cycles, not here.

use crate::config;
use tracing::{debug, info};

/// Fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// The HTTP status code received
        status: u16,
        /// The requested URL
        url: String,
    },
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Fetch the raw bytes at `url`.
pub fn fetch_bytes(url: &str) -> FetchResult<Vec<u8>> {
    debug!(%url, "fetching payload");

    let client = reqwest::blocking::Client::builder()
        .timeout(config::HTTP_TIMEOUT)
        .user_agent(concat!("fuel-mix-archiver/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Http(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response
        .bytes()
        .map_err(|e| FetchError::Http(e.to_string()))?;
    info!(%url, bytes = bytes.len(), "payload fetched");
    Ok(bytes.to_vec())
}
