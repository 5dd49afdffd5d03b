//! Output artifacts for downloaded candles
//!
//! - [`csv::CsvCandleWriter`] - CSV serialization over any `Write`
//! - [`archive::OutputArtifact`] - the file on disk, plain CSV or a single-entry ZIP
//! - [`path`] - default filenames and archive naming

use crate::Candle;

pub mod archive;
pub mod csv;
pub mod path;

pub use archive::OutputArtifact;
pub use path::{archive_entry_name, archive_path, default_output_name};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// ZIP archive error
    #[error("archive error: {0}")]
    ArchiveError(String),

    /// Output file exists and overwriting was not requested
    #[error("output file already exists: {0}")]
    AlreadyExists(String),

    /// Output path has no usable file name
    #[error("invalid output path: {0}")]
    InvalidPath(String),

    /// Candle timestamp cannot be represented as a date
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Sink for candles, one row per candle
pub trait CandleWriter {
    /// Write a single candle
    fn write_candle(&mut self, candle: &Candle) -> OutputResult<()>;

    /// Write multiple candles in order
    fn write_candles(&mut self, candles: &[Candle]) -> OutputResult<()> {
        for candle in candles {
            self.write_candle(candle)?;
        }
        Ok(())
    }

    /// Push buffered rows through to the underlying file
    fn flush(&mut self) -> OutputResult<()>;

    /// Rows written so far (header excluded)
    fn candles_written(&self) -> u64;

    /// Finalize the output
    fn close(self) -> OutputResult<()>;
}
