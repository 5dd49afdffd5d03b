//! Download request and time window resolution

use crate::output::path::CURRENT;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

use super::DownloadError;

/// Calendar date format accepted for `since` and `until`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything needed to run one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Exchange identifier (e.g., "binanceus"), matched case-insensitively
    pub exchange: String,
    /// Symbol in `BASE/QUOTE` form (e.g., "BTC/USDT")
    pub symbol: String,
    /// Inclusive start date, `YYYY-MM-DD`
    pub since: String,
    /// Exclusive end date `YYYY-MM-DD`, or `"current"`/empty for now
    pub until: String,
    /// Pack the CSV into a ZIP archive
    pub compress: bool,
    /// Target CSV path; with `compress`, the archive sits next to it as `.zip`
    pub output_path: PathBuf,
    /// Replace an existing output file instead of failing
    pub overwrite: bool,
}

impl DownloadRequest {
    /// Create a request for a plain, non-overwriting CSV download
    pub fn new(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        since: impl Into<String>,
        until: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            since: since.into(),
            until: until.into(),
            compress: false,
            output_path: output_path.into(),
            overwrite: false,
        }
    }

    /// Set ZIP compression
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set whether an existing output file may be replaced
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Upper bound of a download window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// Midnight UTC at the start of this date (exclusive)
    Date(NaiveDate),
    /// The moment the window is resolved
    Current,
}

impl Until {
    /// Parse `"current"`, empty, or a `YYYY-MM-DD` date
    pub fn parse(input: &str) -> Result<Self, DownloadError> {
        let input = input.trim();
        if input.is_empty() || input == CURRENT {
            return Ok(Self::Current);
        }
        parse_date(input, "until").map(Self::Date)
    }
}

/// Millisecond window `[start_ms, end_ms)` to download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadWindow {
    /// Start time (Unix timestamp in milliseconds, inclusive)
    pub start_ms: i64,
    /// End time (Unix timestamp in milliseconds, exclusive)
    pub end_ms: i64,
}

impl DownloadWindow {
    /// Resolve `since` and `until` against `now`
    ///
    /// `now` is only consulted for [`Until::Current`], and only once.
    ///
    /// # Errors
    /// Returns `DownloadError::ParseError` if either date is malformed.
    pub fn resolve(since: &str, until: &str, now: DateTime<Utc>) -> Result<Self, DownloadError> {
        let start_ms = midnight_ms(parse_date(since.trim(), "since")?);
        let end_ms = match Until::parse(until)? {
            Until::Date(date) => midnight_ms(date),
            Until::Current => now.timestamp_millis(),
        };
        Ok(Self { start_ms, end_ms })
    }

    /// Whether the window contains no time at all
    pub fn is_empty(&self) -> bool {
        self.start_ms >= self.end_ms
    }

    /// Upper bound on candles in the window for a given interval
    pub fn expected_candles(&self, interval_ms: i64) -> u64 {
        if self.is_empty() || interval_ms <= 0 {
            return 0;
        }
        let duration = self.end_ms - self.start_ms;
        ((duration + interval_ms - 1) / interval_ms) as u64
    }
}

/// Outcome of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// File written (the `.zip` path when compressed)
    pub output_path: PathBuf,
    /// Requests issued
    pub pages_fetched: u64,
    /// Candle rows written
    pub candles_written: u64,
    /// Window that was covered
    pub window: DownloadWindow,
}

fn parse_date(input: &str, field: &str) -> Result<NaiveDate, DownloadError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|e| {
        DownloadError::ParseError(format!(
            "invalid {field} date '{input}': {e} (expected YYYY-MM-DD)"
        ))
    })
}

fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
}
