//! # crydl
//!
//! Downloads historical one-minute OHLCV candles for a trading pair from the
//! Binance US public REST API and writes them to a CSV file, optionally packed
//! into a ZIP archive. Also lists the symbols an exchange currently trades and
//! finds which known exchanges support a given symbol.
//!
//! ## Quick Start
//!
//! ```no_run
//! use crydl::downloader::{DownloadExecutor, DownloadRequest};
//! use crydl::registry::ExchangeRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ExchangeRegistry::builtin(None)?;
//! let request = DownloadRequest::new(
//!     "binanceus",
//!     "BTC/USDT",
//!     "2024-01-01",
//!     "2024-01-02",
//!     "btc_usdt.csv",
//! )
//! .with_compress(true);
//!
//! let summary = DownloadExecutor::new(&registry).execute(&request).await?;
//! println!("Saved: {}", summary.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - exchange capability trait, HTTP client, response parsing, pagination cursor
//! - [`registry`] - the set of exchanges this tool knows about
//! - [`downloader`] - download requests and the paginated download executor
//! - [`output`] - CSV and ZIP output artifacts
//! - [`catalog`] - symbol listing and exchange lookup
//! - [`cli`] - command line flags and dispatch

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Symbol listing and exchange lookup
pub mod catalog;

/// CLI flags and dispatch
pub mod cli;

/// Download requests and execution
pub mod downloader;

/// Exchange fetchers
pub mod fetcher;

/// Output artifacts
pub mod output;

/// Known exchanges
pub mod registry;

pub use downloader::{DownloadExecutor, DownloadRequest};
pub use registry::ExchangeRegistry;

/// Trading status that marks a symbol as actively tradable
pub const TRADING_STATUS: &str = "TRADING";

/// One OHLCV candle as returned by the exchange
///
/// Price and volume fields keep the exchange's decimal strings verbatim so the
/// CSV output never goes through floating point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candle {
    /// Open time (Unix timestamp in milliseconds, UTC)
    pub open_time: i64,
    /// Open price
    pub open: String,
    /// High price
    pub high: String,
    /// Low price
    pub low: String,
    /// Close price
    pub close: String,
    /// Volume (base asset)
    pub volume: String,
}

impl Candle {
    /// Open time formatted as `YYYY-MM-DD HH:MM:SS` in UTC
    ///
    /// Returns `None` when the timestamp is outside chrono's supported range.
    pub fn formatted_open_time(&self) -> Option<String> {
        DateTime::from_timestamp_millis(self.open_time)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// Instrument metadata from an exchange's symbol listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolRecord {
    /// Exchange-native symbol without separator (e.g., "BTCUSDT")
    pub symbol: String,
    /// Base asset (e.g., "BTC")
    pub base_asset: String,
    /// Quote asset (e.g., "USDT")
    pub quote_asset: String,
    /// Trading status as reported by the exchange (e.g., "TRADING", "HALT")
    pub status: String,
}

impl SymbolRecord {
    /// Whether the symbol is currently tradable
    pub fn is_trading(&self) -> bool {
        self.status == TRADING_STATUS
    }

    /// Human-facing `BASE/QUOTE` form
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base_asset, self.quote_asset)
    }
}
