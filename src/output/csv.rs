//! CSV serialization of candles

use crate::Candle;
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::io::Write;

use super::{CandleWriter, OutputError, OutputResult};

/// Column header of every candle CSV
pub const CSV_HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// CSV record for one candle
#[derive(Debug, Serialize)]
struct CandleRecord<'a> {
    timestamp: String,
    open: &'a str,
    high: &'a str,
    low: &'a str,
    close: &'a str,
    volume: &'a str,
}

impl<'a> CandleRecord<'a> {
    fn try_from_candle(candle: &'a Candle) -> OutputResult<Self> {
        let timestamp = candle
            .formatted_open_time()
            .ok_or(OutputError::InvalidTimestamp(candle.open_time))?;

        Ok(Self {
            timestamp,
            open: &candle.open,
            high: &candle.high,
            low: &candle.low,
            close: &candle.close,
            volume: &candle.volume,
        })
    }
}

/// CSV writer for candles over any byte sink
///
/// The header is written on construction so an empty download still yields a
/// well-formed file.
pub struct CsvCandleWriter<W: Write> {
    writer: Writer<W>,
    candles_written: u64,
}

impl<W: Write> CsvCandleWriter<W> {
    /// Wrap `inner` and write the header row
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            candles_written: 0,
        })
    }

    /// Flush and return the underlying sink
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))
    }
}

impl<W: Write> CandleWriter for CsvCandleWriter<W> {
    fn write_candle(&mut self, candle: &Candle) -> OutputResult<()> {
        let record = CandleRecord::try_from_candle(candle)?;

        self.writer
            .serialize(&record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write candle: {e}")))?;

        self.candles_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {e}")))
    }

    fn candles_written(&self) -> u64 {
        self.candles_written
    }

    fn close(mut self) -> OutputResult<()> {
        self.flush()
    }
}
