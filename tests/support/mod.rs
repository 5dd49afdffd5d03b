//! Shared test doubles: an in-memory exchange and a loopback HTTP stub

#![allow(dead_code)]

use async_trait::async_trait;
use crydl::fetcher::{ExchangeConfig, ExchangeFetcher, FetcherError, FetcherResult, PageRequest};
use crydl::{Candle, SymbolRecord};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 2024-01-01 00:00:00 UTC
pub const JAN_1_2024_MS: i64 = 1_704_067_200_000;
/// 2024-01-02 00:00:00 UTC
pub const JAN_2_2024_MS: i64 = 1_704_153_600_000;
/// One minute in milliseconds
pub const MINUTE_MS: i64 = 60_000;

/// Helper struct to track fetch calls
#[derive(Clone, Default)]
pub struct FetchTracker {
    pages: Arc<Mutex<Vec<PageRequest>>>,
}

impl FetchTracker {
    pub fn get_count(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    pub fn pages(&self) -> Vec<PageRequest> {
        self.pages.lock().unwrap().clone()
    }

    fn record(&self, page: PageRequest) -> usize {
        let mut pages = self.pages.lock().unwrap();
        pages.push(page);
        pages.len()
    }
}

/// Deterministic candle for a given open time
pub fn synthetic_candle(open_time: i64) -> Candle {
    let minute = (open_time / MINUTE_MS) % 97;
    Candle {
        open_time,
        open: format!("{}.10", 42_000 + minute),
        high: format!("{}.90", 42_001 + minute),
        low: format!("{}.05", 41_999 + minute),
        close: format!("{}.50", 42_000 + minute),
        volume: format!("{}.125", minute),
    }
}

pub fn symbol(base: &str, quote: &str, status: &str) -> SymbolRecord {
    SymbolRecord {
        symbol: format!("{base}{quote}"),
        base_asset: base.to_string(),
        quote_asset: quote.to_string(),
        status: status.to_string(),
    }
}

/// In-memory exchange with one candle per minute over `[data_start, data_end)`
pub struct MockExchange {
    name: String,
    config: ExchangeConfig,
    data_start: i64,
    data_end: i64,
    symbols: Vec<SymbolRecord>,
    fail_on_call: Option<usize>,
    fail_listing: bool,
    tracker: FetchTracker,
}

impl MockExchange {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: ExchangeConfig::binance_us(),
            data_start: i64::MIN / 2,
            data_end: i64::MAX / 2,
            symbols: vec![
                symbol("BTC", "USDT", "TRADING"),
                symbol("ETH", "USD", "TRADING"),
            ],
            fail_on_call: None,
            fail_listing: false,
            tracker: FetchTracker::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.config = self.config.with_page_size(page_size);
        self
    }

    pub fn with_data_range(mut self, start: i64, end: i64) -> Self {
        self.data_start = start;
        self.data_end = end;
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<SymbolRecord>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Fail the n-th candle request (1-based) with a transport error
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn tracker(&self) -> FetchTracker {
        self.tracker.clone()
    }
}

#[async_trait]
impl ExchangeFetcher for MockExchange {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    async fn fetch_candles(&self, _symbol: &str, page: &PageRequest) -> FetcherResult<Vec<Candle>> {
        let call = self.tracker.record(*page);
        if self.fail_on_call == Some(call) {
            return Err(FetcherError::Transport(format!(
                "connection reset on request {call}"
            )));
        }

        let from = page.start_time.max(self.data_start);
        let first = from + (MINUTE_MS - from.rem_euclid(MINUTE_MS)) % MINUTE_MS;
        let end = page.end_time.min(self.data_end);

        Ok((0..page.limit as i64)
            .map(|i| first + i * MINUTE_MS)
            .take_while(|open_time| *open_time < end)
            .map(synthetic_candle)
            .collect())
    }

    async fn list_symbols(&self) -> FetcherResult<Vec<SymbolRecord>> {
        if self.fail_listing {
            return Err(FetcherError::Transport("exchangeInfo unavailable".to_string()));
        }
        Ok(self.symbols.clone())
    }
}

/// Loopback HTTP server answering each connection with the next canned response
///
/// Once the canned responses run out, every request gets `200 []`.
pub struct HttpStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl HttpStub {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            let mut responses = responses.into_iter();
            while let Ok((mut socket, _)) = listener.accept().await {
                let target = read_request_target(&mut socket).await;
                recorded.lock().unwrap().push(target);

                let (status, body) = responses.next().unwrap_or((200, "[]".to_string()));
                let reply = format!(
                    "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    if status < 400 { "OK" } else { "Error" },
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request targets (`/path?query`) received so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

/// HTTP client that ignores proxy environment variables
pub fn direct_client() -> Arc<reqwest::Client> {
    Arc::new(reqwest::Client::builder().no_proxy().build().unwrap())
}

/// Binance kline array for a candle, with the trailing fields Binance sends
pub fn kline_json(candle: &Candle) -> serde_json::Value {
    serde_json::json!([
        candle.open_time,
        candle.open,
        candle.high,
        candle.low,
        candle.close,
        candle.volume,
        candle.open_time + MINUTE_MS - 1,
        "0.0",
        12,
        "0.0",
        "0.0",
        "0"
    ])
}

/// Read a CSV file's data rows (header excluded)
pub fn data_rows(content: &str) -> Vec<String> {
    content.lines().skip(1).map(str::to_string).collect()
}
