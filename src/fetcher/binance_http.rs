//! Binance HTTP client helper module
//!
//! One GET per call, no retries: a transport failure or non-2xx status is
//! terminal for the current invocation.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetcher::{FetcherError, FetcherResult};

/// Longest error body echoed back in an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client for Binance REST endpoints
pub struct BinanceHttpClient {
    client: Arc<Client>,
    base_url: String,
}

impl BinanceHttpClient {
    /// Create new HTTP client
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (Arc for cheap cloning)
    /// * `base_url` - Base URL for API endpoints (e.g., "<https://api.binance.us>")
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute GET request and deserialize the JSON body
    ///
    /// # Errors
    /// - `FetcherError::Transport` on connection failures and non-2xx statuses
    /// - `FetcherError::Decode` when the body is not the expected JSON
    pub async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Making GET request to: {} with {} params", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetcherError::Transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if let Some(weight) = parse_weight_header(response.headers()) {
            debug!(weight, "Response weight");
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetcherError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(%status, url = %url, "Request rejected by exchange");
            return Err(FetcherError::Transport(format!(
                "HTTP {status} from {url}: {}",
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetcherError::Decode(format!("failed to deserialize response from {url}: {e}")))
    }
}

/// Parse the X-MBX-USED-WEIGHT-1M header Binance attaches to every response
fn parse_weight_header(headers: &reqwest::header::HeaderMap) -> Option<u32> {
    headers
        .get("X-MBX-USED-WEIGHT-1M")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn truncate(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
