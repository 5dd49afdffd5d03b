//! Exchange endpoint configuration
//!
//! Everything the pagination loop needs to know about an exchange's REST
//! surface lives here, so the loop itself carries no literals.
//!
//! # Binance US
//!
//! - Base URL: <https://api.binance.us>
//! - Klines: `/api/v3/klines`, at most 1000 rows per request
//! - Exchange info: `/api/v3/exchangeInfo`

/// One-minute interval in milliseconds
pub const ONE_MINUTE_MS: i64 = 60_000;

/// Binance US public REST base URL
pub const BINANCE_US_BASE_URL: &str = "https://api.binance.us";

/// Maximum klines Binance returns for a single request
pub const BINANCE_KLINES_LIMIT: usize = 1000;

/// Configuration for one exchange's market data API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Base URL for API requests (overridable for tests)
    pub base_url: String,

    /// Klines endpoint path
    pub klines_endpoint: &'static str,

    /// Exchange info endpoint path
    pub exchange_info_endpoint: &'static str,

    /// Candle interval as the API spells it
    pub interval: &'static str,

    /// Candle interval in milliseconds; the pagination cursor advances by this much
    pub interval_ms: i64,

    /// Rows requested per page
    pub page_size: usize,
}

impl ExchangeConfig {
    /// Binance US spot market, one-minute candles
    pub fn binance_us() -> Self {
        Self {
            base_url: BINANCE_US_BASE_URL.to_string(),
            klines_endpoint: "/api/v3/klines",
            exchange_info_endpoint: "/api/v3/exchangeInfo",
            interval: "1m",
            interval_ms: ONE_MINUTE_MS,
            page_size: BINANCE_KLINES_LIMIT,
        }
    }

    /// Replace the base URL, trimming any trailing slash
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
