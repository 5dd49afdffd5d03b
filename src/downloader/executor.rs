//! Download executor: pages through an exchange and streams candles to disk

use crate::downloader::{DownloadError, DownloadRequest, DownloadSummary, DownloadWindow};
use crate::fetcher::{CandleCursor, ExchangeFetcher};
use crate::output::{CandleWriter, OutputArtifact};
use crate::registry::ExchangeRegistry;
use chrono::Utc;
use indicatif::ProgressBar;
use tracing::{debug, info, warn, Instrument};

/// Runs download requests against the exchanges of a registry
pub struct DownloadExecutor<'a> {
    registry: &'a ExchangeRegistry,
    progress: ProgressBar,
}

impl<'a> DownloadExecutor<'a> {
    /// Create an executor with no visible progress output
    pub fn new(registry: &'a ExchangeRegistry) -> Self {
        Self {
            registry,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Execute one download
    ///
    /// Checks run in order: exchange, dates, output file. A failure in an
    /// earlier check leaves no file behind and makes no network calls.
    ///
    /// # Errors
    /// - `FetcherError::UnsupportedExchange` for an unknown exchange
    /// - `DownloadError::ParseError` for a malformed date
    /// - `OutputError` if the file cannot be created or written
    /// - `FetcherError::Transport` / `FetcherError::Decode` from any page
    pub async fn execute(&self, request: &DownloadRequest) -> Result<DownloadSummary, DownloadError> {
        let span = tracing::info_span!(
            "download",
            exchange = %request.exchange,
            symbol = %request.symbol,
            since = %request.since,
            until = %request.until
        );
        self.execute_inner(request).instrument(span).await
    }

    async fn execute_inner(&self, request: &DownloadRequest) -> Result<DownloadSummary, DownloadError> {
        let fetcher = self.registry.resolve(&request.exchange)?;
        let window = DownloadWindow::resolve(&request.since, &request.until, Utc::now())?;

        let interval_ms = fetcher.config().interval_ms;
        let expected = window.expected_candles(interval_ms);
        info!(
            start_ms = window.start_ms,
            end_ms = window.end_ms,
            expected_candles = expected,
            "Starting download"
        );

        let mut artifact =
            OutputArtifact::create(&request.output_path, request.compress, request.overwrite)?;
        let output_path = artifact.path().to_path_buf();

        self.progress.set_length(expected);
        self.progress.set_position(0);

        let mut cursor = CandleCursor::new(
            window.start_ms,
            window.end_ms,
            fetcher.config().page_size,
            interval_ms,
        );

        if let Err(e) = self
            .fetch_all(fetcher.as_ref(), &request.symbol, &mut cursor, &mut artifact)
            .await
        {
            let written = artifact.candles_written();
            if let Err(close_err) = artifact.close() {
                warn!(error = %close_err, "Failed to close output after error");
            }
            self.progress.abandon();
            warn!(candles_written = written, error = %e, "Download failed");
            return Err(e);
        }

        let candles_written = artifact.candles_written();
        artifact.close()?;
        self.progress.finish();

        info!(
            path = %output_path.display(),
            pages = cursor.pages(),
            candles = candles_written,
            "Download completed"
        );

        Ok(DownloadSummary {
            output_path,
            pages_fetched: cursor.pages(),
            candles_written,
            window,
        })
    }

    async fn fetch_all(
        &self,
        fetcher: &dyn ExchangeFetcher,
        symbol: &str,
        cursor: &mut CandleCursor,
        artifact: &mut OutputArtifact,
    ) -> Result<(), DownloadError> {
        while let Some(page) = cursor.next_request() {
            debug!(
                start_time = page.start_time,
                end_time = page.end_time,
                limit = page.limit,
                "Fetching page"
            );

            let candles = fetcher.fetch_candles(symbol, &page).await?;
            cursor.advance(&candles)?;

            artifact.write_candles(&candles)?;
            artifact.flush()?;

            self.progress.inc(candles.len() as u64);
            debug!(
                received = candles.len(),
                next_start = cursor.position(),
                "Page written"
            );
        }
        Ok(())
    }
}
