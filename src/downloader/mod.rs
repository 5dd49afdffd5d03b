//! Download orchestration
//!
//! # Overview
//!
//! 1. **Request**: describe what to download with [`job::DownloadRequest`]
//! 2. **Window**: resolve `since`/`until` into a millisecond window with [`job::DownloadWindow`]
//! 3. **Execution**: page through the exchange and write the artifact with
//!    [`executor::DownloadExecutor`]
//!
//! # Error Handling
//!
//! Every error is terminal for the invocation; nothing is retried. Rows
//! flushed before a failure stay on disk.

pub mod executor;
pub mod job;

pub use executor::DownloadExecutor;
pub use job::{DownloadRequest, DownloadSummary, DownloadWindow, Until};

use crate::fetcher::FetcherError;
use crate::output::OutputError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Date argument failed to parse
    #[error("parse error: {0}")]
    ParseError(String),

    /// Exchange lookup, transport or decode failure
    #[error(transparent)]
    Fetcher(#[from] FetcherError),

    /// Output artifact failure
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl DownloadError {
    /// Whether the error is an unknown exchange identifier
    pub fn is_unsupported_exchange(&self) -> bool {
        matches!(self, Self::Fetcher(FetcherError::UnsupportedExchange(_)))
    }
}
