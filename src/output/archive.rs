//! Output artifact on disk: a plain CSV file or a ZIP archive with one CSV entry

use crate::Candle;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::csv::CsvCandleWriter;
use super::path::{archive_entry_name, archive_path};
use super::{CandleWriter, OutputError, OutputResult};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// The single file produced by a download
pub enum OutputArtifact {
    /// Flat CSV file
    Plain {
        /// File path
        path: PathBuf,
        /// CSV writer over the buffered file
        writer: CsvCandleWriter<BufWriter<File>>,
    },
    /// ZIP archive whose only entry is the CSV
    Zip {
        /// Archive path
        path: PathBuf,
        /// CSV writer streaming into the archive entry
        writer: CsvCandleWriter<ZipWriter<File>>,
    },
}

impl OutputArtifact {
    /// Create the artifact for `target` and write the CSV header
    ///
    /// With `compress`, the archive path is `target` with `.csv` replaced by
    /// `.zip` and the entry inside is named after `target`'s file name.
    ///
    /// # Errors
    /// - `OutputError::AlreadyExists` when the file exists and `overwrite` is false
    /// - `OutputError::IoError` / `OutputError::ArchiveError` on filesystem failures
    pub fn create(target: &Path, compress: bool, overwrite: bool) -> OutputResult<Self> {
        if compress {
            let path = archive_path(target)?;
            let entry_name = archive_entry_name(target)?;
            info!(
                "Creating ZIP output: path={}, entry={}",
                path.display(),
                entry_name
            );

            let file = open_output_file(&path, overwrite)?;
            let mut zip = ZipWriter::new(file);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(entry_name, options)
                .map_err(|e| OutputError::ArchiveError(format!("Failed to start entry: {e}")))?;

            Ok(Self::Zip {
                path,
                writer: CsvCandleWriter::new(zip)?,
            })
        } else {
            let path = target.to_path_buf();
            info!("Creating CSV output: path={}", path.display());

            let file = open_output_file(&path, overwrite)?;
            let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);

            Ok(Self::Plain {
                path,
                writer: CsvCandleWriter::new(buf_writer)?,
            })
        }
    }

    /// Path of the file on disk
    pub fn path(&self) -> &Path {
        match self {
            Self::Plain { path, .. } | Self::Zip { path, .. } => path,
        }
    }
}

impl CandleWriter for OutputArtifact {
    fn write_candle(&mut self, candle: &Candle) -> OutputResult<()> {
        match self {
            Self::Plain { writer, .. } => writer.write_candle(candle),
            Self::Zip { writer, .. } => writer.write_candle(candle),
        }
    }

    fn flush(&mut self) -> OutputResult<()> {
        match self {
            Self::Plain { writer, .. } => writer.flush(),
            Self::Zip { writer, .. } => writer.flush(),
        }
    }

    fn candles_written(&self) -> u64 {
        match self {
            Self::Plain { writer, .. } => writer.candles_written(),
            Self::Zip { writer, .. } => writer.candles_written(),
        }
    }

    fn close(self) -> OutputResult<()> {
        let candles_written = self.candles_written();
        debug!("Closing output: {} total candles written", candles_written);

        let (path, file) = match self {
            Self::Plain { path, writer } => {
                let buf_writer = writer.into_inner()?;
                let file = buf_writer.into_inner().map_err(|e| {
                    OutputError::IoError(format!("Failed to get file handle: {e}"))
                })?;
                (path, file)
            }
            Self::Zip { path, writer } => {
                let mut zip = writer.into_inner()?;
                let file = zip
                    .finish()
                    .map_err(|e| OutputError::ArchiveError(format!("Failed to finish archive: {e}")))?;
                (path, file)
            }
        };

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        info!(
            "Output closed successfully: path={}, candles={}",
            path.display(),
            candles_written
        );
        Ok(())
    }
}

/// Open the output file, creating parent directories as needed
fn open_output_file(path: &Path, overwrite: bool) -> OutputResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    options.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => OutputError::AlreadyExists(path.display().to_string()),
        _ => OutputError::IoError(format!("Failed to create file {}: {e}", path.display())),
    })
}
