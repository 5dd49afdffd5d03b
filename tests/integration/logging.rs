//! Structured logging emitted by downloads

use crate::support::MockExchange;
use crydl::downloader::{DownloadExecutor, DownloadRequest};
use crydl::registry::ExchangeRegistry;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// In-memory log sink shared with the subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

async fn run_small_download() {
    let dir = TempDir::new().unwrap();
    let registry = ExchangeRegistry::empty()
        .with_exchange(Arc::new(MockExchange::new("binanceus").with_page_size(500)));
    let request = DownloadRequest::new(
        "binanceus",
        "BTC/USDT",
        "2024-01-01",
        "2024-01-02",
        dir.path().join("btc.csv"),
    );
    DownloadExecutor::new(&registry).execute(&request).await.unwrap();
}

#[tokio::test]
async fn test_download_logs_structured_fields() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("crydl=debug"))
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    run_small_download().await;

    let output = logs.contents();
    assert!(output.contains("Starting download"), "logs: {output}");
    assert!(output.contains("expected_candles=1440"), "logs: {output}");
    assert!(output.contains("Fetching page"), "logs: {output}");
    assert!(output.contains("Download completed"), "logs: {output}");
    assert!(output.contains("candles=1440"), "logs: {output}");
    assert!(output.contains("symbol=BTC/USDT"), "logs: {output}");
}

#[tokio::test]
async fn test_json_logs_are_machine_readable() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("crydl=info"))
        .with_writer(move || sink.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    run_small_download().await;

    let events: Vec<serde_json::Value> = logs
        .contents()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let completed = events
        .iter()
        .find(|event| event["fields"]["message"] == "Download completed")
        .expect("completion event");
    assert_eq!(completed["level"], "INFO");
    assert_eq!(completed["fields"]["candles"], 1440);
    assert_eq!(completed["fields"]["pages"], 3);

    assert!(
        events.iter().all(|event| event["level"] != "DEBUG"),
        "info filter let debug events through"
    );
}

#[test]
fn test_env_filter_directives_parse() {
    for directive in ["info", "crydl=debug", "warn,crydl=trace"] {
        assert!(
            directive.parse::<EnvFilter>().is_ok(),
            "directive {directive} failed to parse"
        );
    }
}
