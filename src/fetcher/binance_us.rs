//! Binance US spot market fetcher

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::binance_http::BinanceHttpClient;
use super::binance_parser::{BinanceParser, ExchangeInfoResponse};
use super::pagination::PageRequest;
use super::shared_resources::global_http_client;
use super::{ExchangeConfig, ExchangeFetcher, FetcherResult};
use crate::{Candle, SymbolRecord};

/// Identifier of the Binance US exchange on the command line
pub const BINANCE_US: &str = "binanceus";

/// Fetcher for the Binance US public REST API
pub struct BinanceUsFetcher {
    http_client: BinanceHttpClient,
    config: ExchangeConfig,
}

impl BinanceUsFetcher {
    /// Create a fetcher using the global HTTP client and production endpoints
    pub fn new() -> Self {
        Self::with_client(global_http_client(), ExchangeConfig::binance_us())
    }

    /// Create a fetcher with an explicit client and configuration
    ///
    /// Used for proxied clients and for pointing the fetcher at a local test server.
    pub fn with_client(client: Arc<Client>, config: ExchangeConfig) -> Self {
        let http_client = BinanceHttpClient::new(client, config.base_url.clone());
        Self {
            http_client,
            config,
        }
    }
}

impl Default for BinanceUsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeFetcher for BinanceUsFetcher {
    fn name(&self) -> &str {
        BINANCE_US
    }

    fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    async fn fetch_candles(&self, symbol: &str, page: &PageRequest) -> FetcherResult<Vec<Candle>> {
        let api_symbol = BinanceParser::normalize_symbol(symbol);
        debug!(
            "Fetching klines: symbol={}, interval={}, start={}, end={}, limit={}",
            api_symbol, self.config.interval, page.start_time, page.end_time, page.limit
        );

        let params = [
            ("symbol", api_symbol),
            ("interval", self.config.interval.to_string()),
            ("startTime", page.start_time.to_string()),
            ("endTime", page.end_time.to_string()),
            ("limit", page.limit.to_string()),
        ];

        let klines: Vec<Value> = self
            .http_client
            .get(self.config.klines_endpoint, &params)
            .await?;

        let candles = BinanceParser::parse_klines(klines)?;
        debug!("Fetched {} candles", candles.len());
        Ok(candles)
    }

    async fn list_symbols(&self) -> FetcherResult<Vec<SymbolRecord>> {
        info!("Fetching exchange info from API");

        let info: ExchangeInfoResponse = self
            .http_client
            .get(self.config.exchange_info_endpoint, &[])
            .await?;

        let symbols = BinanceParser::parse_exchange_info(info);
        debug!("Received {} symbols from API", symbols.len());
        Ok(symbols)
    }
}
