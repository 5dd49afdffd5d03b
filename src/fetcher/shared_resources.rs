//! Shared HTTP client for fetcher instances
//!
//! Fetchers without a proxy reuse one process-wide `reqwest::Client` so its
//! connection pool is shared. A proxied client is built per registry.

use once_cell::sync::Lazy;
use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{FetcherError, FetcherResult};

/// HTTP connect timeout (seconds) - time to establish TCP connection
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP request timeout (seconds) - overall time for the entire request
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Global HTTP client shared by all fetchers that do not use a proxy
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(base_builder().build().unwrap_or_else(|e| {
        panic!("FATAL: Failed to build HTTP client: {e}. Check system TLS configuration.");
    }))
});

fn base_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
}

/// Get the global HTTP client
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}

/// Get an HTTP client, routed through `proxy` for every scheme when given
///
/// # Errors
/// Returns `FetcherError::Transport` if the proxy URL is invalid or the client
/// cannot be built.
pub fn http_client(proxy: Option<&str>) -> FetcherResult<Arc<Client>> {
    let Some(proxy_url) = proxy.filter(|p| !p.trim().is_empty()) else {
        return Ok(global_http_client());
    };

    debug!(proxy = %proxy_url, "Building proxied HTTP client");
    let proxy = Proxy::all(proxy_url)
        .map_err(|e| FetcherError::Transport(format!("invalid proxy URL {proxy_url}: {e}")))?;

    let client = base_builder()
        .proxy(proxy)
        .build()
        .map_err(|e| FetcherError::Transport(format!("failed to build HTTP client: {e}")))?;
    Ok(Arc::new(client))
}
