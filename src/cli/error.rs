//! CLI error types and conversions

use crate::downloader::DownloadError;
use crate::fetcher::FetcherError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Download error
    #[error(transparent)]
    DownloadError(#[from] DownloadError),

    /// Fetcher error
    #[error(transparent)]
    FetcherError(#[from] FetcherError),

    /// Terminal output failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
