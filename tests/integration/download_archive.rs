//! Compressed downloads produce a single-entry ZIP archive

use crate::support::{data_rows, MockExchange};
use crydl::downloader::{DownloadError, DownloadExecutor, DownloadRequest};
use crydl::fetcher::FetcherError;
use crydl::registry::ExchangeRegistry;
use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_zip_entry_matches_plain_output() {
    let dir = TempDir::new().unwrap();
    let registry = ExchangeRegistry::empty()
        .with_exchange(Arc::new(MockExchange::new("binanceus").with_page_size(500)));

    let plain = dir.path().join("plain").join("x.csv");
    let request = DownloadRequest::new("binanceus", "ETH/USD", "2024-01-01", "2024-01-02", &plain);
    DownloadExecutor::new(&registry).execute(&request).await.unwrap();

    let zipped = dir.path().join("zipped").join("x.csv");
    let request = DownloadRequest::new("binanceus", "ETH/USD", "2024-01-01", "2024-01-02", &zipped)
        .with_compress(true);
    let summary = DownloadExecutor::new(&registry).execute(&request).await.unwrap();

    let archive_path = dir.path().join("zipped").join("x.zip");
    assert_eq!(summary.output_path, archive_path);
    assert!(!zipped.exists(), "uncompressed file must not be written");

    let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);

    let mut entry = archive.by_index(0).unwrap();
    assert_eq!(entry.name(), "x.csv");
    let mut content = Vec::new();
    entry.read_to_end(&mut content).unwrap();

    assert_eq!(content, std::fs::read(&plain).unwrap());
}

#[tokio::test]
async fn test_zip_name_appends_suffix_without_csv_extension() {
    let dir = TempDir::new().unwrap();
    let registry = ExchangeRegistry::empty().with_exchange(Arc::new(MockExchange::new("binanceus")));

    let target = dir.path().join("candles");
    let request = DownloadRequest::new("binanceus", "BTC/USDT", "2024-01-01", "2024-01-01", &target)
        .with_compress(true);
    let summary = DownloadExecutor::new(&registry).execute(&request).await.unwrap();

    assert_eq!(summary.output_path, dir.path().join("candles.zip"));

    let mut archive = zip::ZipArchive::new(File::open(&summary.output_path).unwrap()).unwrap();
    let mut entry = archive.by_name("candles").unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    assert_eq!(content, "timestamp,open,high,low,close,volume\n");
}

#[tokio::test]
async fn test_failed_compressed_download_keeps_readable_archive() {
    let dir = TempDir::new().unwrap();
    let registry = ExchangeRegistry::empty().with_exchange(Arc::new(
        MockExchange::new("binanceus")
            .with_page_size(100)
            .failing_on_call(3),
    ));

    let target = dir.path().join("x.csv");
    let request = DownloadRequest::new("binanceus", "BTC/USDT", "2024-01-01", "2024-01-02", &target)
        .with_compress(true);
    let result = DownloadExecutor::new(&registry).execute(&request).await;

    assert!(matches!(
        result,
        Err(DownloadError::Fetcher(FetcherError::Transport(_)))
    ));
    assert!(!target.exists());

    let archive_path = dir.path().join("x.zip");
    let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);

    let mut entry = archive.by_name("x.csv").unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    assert!(content.starts_with("timestamp,open,high,low,close,volume\n"));
    assert_eq!(data_rows(&content).len(), 200);
}
