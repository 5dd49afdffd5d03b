//! Registry of exchanges this tool knows about
//!
//! Every operation resolves its exchange through the registry first, so an
//! unknown identifier fails before any request is made or file is created.

use crate::fetcher::binance_us::BinanceUsFetcher;
use crate::fetcher::shared_resources::http_client;
use crate::fetcher::{ExchangeConfig, ExchangeFetcher, FetcherError, FetcherResult};
use std::sync::Arc;
use tracing::debug;

/// Ordered set of exchange fetchers keyed by lowercase identifier
#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    entries: Vec<(String, Arc<dyn ExchangeFetcher>)>,
}

impl ExchangeRegistry {
    /// Registry with no exchanges
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in exchange
    ///
    /// # Arguments
    /// * `proxy` - Optional proxy URL applied to all exchange traffic
    ///
    /// # Errors
    /// Returns `FetcherError::Transport` if the proxy URL is invalid.
    pub fn builtin(proxy: Option<&str>) -> FetcherResult<Self> {
        let client = http_client(proxy)?;
        let binance_us = BinanceUsFetcher::with_client(client, ExchangeConfig::binance_us());
        Ok(Self::empty().with_exchange(Arc::new(binance_us)))
    }

    /// Add an exchange, keyed by its [`ExchangeFetcher::name`]
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn with_exchange(mut self, fetcher: Arc<dyn ExchangeFetcher>) -> Self {
        let key = fetcher.name().to_lowercase();
        self.entries.retain(|(name, _)| *name != key);
        self.entries.push((key, fetcher));
        self
    }

    /// Identifiers of all registered exchanges, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterate over registered exchanges in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn ExchangeFetcher>)> {
        self.entries.iter().map(|(name, fetcher)| (name.as_str(), fetcher))
    }

    /// Look up an exchange by identifier, ignoring case
    ///
    /// # Errors
    /// Returns `FetcherError::UnsupportedExchange` if no exchange matches.
    pub fn resolve(&self, exchange: &str) -> FetcherResult<Arc<dyn ExchangeFetcher>> {
        let key = exchange.trim().to_lowercase();
        let fetcher = self
            .entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, fetcher)| Arc::clone(fetcher))
            .ok_or_else(|| FetcherError::UnsupportedExchange(exchange.to_string()))?;

        debug!(exchange = %key, "Resolved exchange");
        Ok(fetcher)
    }
}

impl std::fmt::Debug for ExchangeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRegistry")
            .field("exchanges", &self.names())
            .finish()
    }
}
