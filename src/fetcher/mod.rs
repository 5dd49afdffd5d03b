//! Exchange fetchers

use crate::{Candle, SymbolRecord};
use async_trait::async_trait;

pub mod binance_http;
pub mod binance_parser;
pub mod binance_us;
pub mod config;
pub mod pagination;
pub mod shared_resources;

pub use config::ExchangeConfig;
pub use pagination::{CandleCursor, PageRequest};

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Exchange identifier not recognized
    #[error("unsupported exchange: {0}")]
    UnsupportedExchange(String),

    /// Network or HTTP failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body is not valid JSON or lacks expected fields
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Market data capabilities of one exchange
#[async_trait]
pub trait ExchangeFetcher: Send + Sync {
    /// Exchange identifier as used on the command line (e.g., "binanceus")
    fn name(&self) -> &str;

    /// Static configuration (endpoints, interval, page size)
    fn config(&self) -> &ExchangeConfig;

    /// Fetch one page of candles
    ///
    /// # Arguments
    /// * `symbol` - Human-facing symbol (e.g., "BTC/USDT"); implementations normalize it
    /// * `page` - Window start, exclusive window end and row limit for this request
    ///
    /// # Returns
    /// Candles in exchange order, at most `page.limit` of them
    async fn fetch_candles(&self, symbol: &str, page: &PageRequest) -> FetcherResult<Vec<Candle>>;

    /// List every instrument the exchange reports, regardless of status
    async fn list_symbols(&self) -> FetcherResult<Vec<SymbolRecord>>;
}
