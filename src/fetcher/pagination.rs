//! Time-windowed pagination cursor for klines
//!
//! The cursor walks the window `[start, end)` one page at a time. After each
//! page it moves to the last row's open time plus one interval, so the next
//! request starts strictly after the rows already received and page
//! boundaries never repeat a candle.
//!
//! Pagination stops when:
//! - the cursor reaches `end`
//! - a page comes back empty
//! - a page is shorter than the page size

use crate::fetcher::{FetcherError, FetcherResult};
use crate::Candle;
use tracing::debug;

/// One klines request: `[start_time, end_time)` with a row limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Start time (Unix timestamp in milliseconds)
    pub start_time: i64,
    /// End time (Unix timestamp in milliseconds)
    pub end_time: i64,
    /// Maximum rows to return
    pub limit: usize,
}

/// Pagination state for one download window
#[derive(Debug, Clone)]
pub struct CandleCursor {
    start: i64,
    end: i64,
    page_size: usize,
    interval_ms: i64,
    pages: u64,
    exhausted: bool,
}

impl CandleCursor {
    /// Create a cursor over `[start_time, end_time)`
    pub fn new(start_time: i64, end_time: i64, page_size: usize, interval_ms: i64) -> Self {
        Self {
            start: start_time,
            end: end_time,
            page_size,
            interval_ms,
            pages: 0,
            exhausted: false,
        }
    }

    /// Current cursor position (Unix timestamp in milliseconds)
    pub fn position(&self) -> i64 {
        self.start
    }

    /// Number of pages consumed so far
    pub fn pages(&self) -> u64 {
        self.pages
    }

    /// Next request to issue, or `None` when the window is done
    pub fn next_request(&self) -> Option<PageRequest> {
        if self.exhausted || self.start >= self.end {
            return None;
        }

        Some(PageRequest {
            start_time: self.start,
            end_time: self.end,
            limit: self.page_size,
        })
    }

    /// Consume a page returned for the last request
    ///
    /// # Errors
    /// Returns `FetcherError::Decode` when the page would not move the cursor
    /// forward, which would otherwise request the same page forever.
    pub fn advance(&mut self, page: &[Candle]) -> FetcherResult<()> {
        self.pages += 1;

        let Some(last) = page.last() else {
            debug!(
                page = self.pages,
                position = self.start,
                "Empty page received, no more data in range"
            );
            self.exhausted = true;
            return Ok(());
        };

        let next_start = last.open_time.checked_add(self.interval_ms).ok_or_else(|| {
            FetcherError::Decode(format!(
                "page {} has out-of-range open time {}",
                self.pages, last.open_time
            ))
        })?;
        if next_start <= self.start {
            return Err(FetcherError::Decode(format!(
                "page {} ends at open time {} which does not advance past cursor {}",
                self.pages, last.open_time, self.start
            )));
        }
        self.start = next_start;

        if page.len() < self.page_size {
            debug!(
                page = self.pages,
                rows = page.len(),
                "Short page received, window exhausted"
            );
            self.exhausted = true;
        }

        Ok(())
    }
}
