//! Binance response parser
//!
//! Stateless conversions from Binance API JSON into [`Candle`] and
//! [`SymbolRecord`].

use crate::fetcher::{FetcherError, FetcherResult};
use crate::{Candle, SymbolRecord};
use serde::Deserialize;
use serde_json::Value;

/// Elements of a kline array this crate reads: open time plus OHLCV
const KLINE_FIELDS_USED: usize = 6;

/// `GET /api/v3/exchangeInfo` payload, reduced to what symbol listing needs
#[derive(Debug, Deserialize)]
pub struct ExchangeInfoResponse {
    /// Every instrument on the exchange
    pub symbols: Vec<ExchangeInfoSymbol>,
}

/// One entry of the exchangeInfo `symbols` array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfoSymbol {
    /// Symbol without separator (e.g., "BTCUSDT")
    pub symbol: String,
    /// Trading status (e.g., "TRADING", "BREAK")
    pub status: String,
    /// Base asset
    pub base_asset: String,
    /// Quote asset
    pub quote_asset: String,
}

impl From<ExchangeInfoSymbol> for SymbolRecord {
    fn from(raw: ExchangeInfoSymbol) -> Self {
        Self {
            symbol: raw.symbol,
            base_asset: raw.base_asset,
            quote_asset: raw.quote_asset,
            status: raw.status,
        }
    }
}

/// Stateless parser for Binance API responses
pub struct BinanceParser;

impl BinanceParser {
    /// Parse Binance klines JSON arrays to candles
    ///
    /// # Format
    /// `[open_time, open, high, low, close, volume, close_time, ...]`; only the
    /// first six elements are read, the rest are ignored.
    ///
    /// # Errors
    /// Returns `FetcherError::Decode` if a kline is not an array, is too short,
    /// has a non-integer open time, or a non-string price/volume.
    pub fn parse_klines(klines: Vec<Value>) -> FetcherResult<Vec<Candle>> {
        let mut candles = Vec::with_capacity(klines.len());

        for (index, kline) in klines.into_iter().enumerate() {
            let arr = kline
                .as_array()
                .ok_or_else(|| FetcherError::Decode(format!("kline {index} is not an array")))?;

            if arr.len() < KLINE_FIELDS_USED {
                return Err(FetcherError::Decode(format!(
                    "kline {index} has {} elements, expected at least {KLINE_FIELDS_USED}",
                    arr.len()
                )));
            }

            let open_time = arr[0].as_i64().ok_or_else(|| {
                FetcherError::Decode(format!("kline {index}: open time is not an integer"))
            })?;

            candles.push(Candle {
                open_time,
                open: Self::string_field(&arr[1], index, "open")?,
                high: Self::string_field(&arr[2], index, "high")?,
                low: Self::string_field(&arr[3], index, "low")?,
                close: Self::string_field(&arr[4], index, "close")?,
                volume: Self::string_field(&arr[5], index, "volume")?,
            });
        }

        Ok(candles)
    }

    /// Convert an exchangeInfo payload to symbol records, keeping API order
    pub fn parse_exchange_info(info: ExchangeInfoResponse) -> Vec<SymbolRecord> {
        info.symbols.into_iter().map(SymbolRecord::from).collect()
    }

    /// Normalize a human-facing symbol for the API
    ///
    /// # Examples
    /// ```
    /// use crydl::fetcher::binance_parser::BinanceParser;
    ///
    /// assert_eq!(BinanceParser::normalize_symbol("BTC/USDT"), "BTCUSDT");
    /// assert_eq!(BinanceParser::normalize_symbol("BTCUSDT"), "BTCUSDT");
    /// ```
    pub fn normalize_symbol(symbol: &str) -> String {
        symbol.replace('/', "")
    }

    fn string_field(value: &Value, index: usize, field_name: &str) -> FetcherResult<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FetcherError::Decode(format!("kline {index}: {field_name} is not a string")))
    }
}
