//! Command line flags and dispatch

use crate::catalog::{find_exchanges_for_symbol, list_symbols_for_exchange};
use crate::downloader::{DownloadExecutor, DownloadRequest};
use crate::output::default_output_name;
use crate::output::path::CURRENT;
use crate::registry::ExchangeRegistry;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use super::CliError;

/// Download one-minute crypto candles to CSV
#[derive(Debug, Parser)]
#[command(name = "crydl")]
#[command(
    about = "Download historical 1m OHLCV candles from crypto exchanges",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Exchange identifier (e.g., binanceus)
    #[arg(long)]
    pub exchange: Option<String>,

    /// Trading pair in BASE/QUOTE form (e.g., BTC/USDT)
    #[arg(long)]
    pub symbol: Option<String>,

    /// First day to download, YYYY-MM-DD (UTC, inclusive)
    #[arg(long)]
    pub since: Option<String>,

    /// Day to stop at, YYYY-MM-DD (UTC, exclusive); "current" or empty means now
    #[arg(long)]
    pub until: Option<String>,

    /// Download up to the current time, ignoring --until
    #[arg(long, default_value_t = false)]
    pub current: bool,

    /// Proxy URL for all exchange requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Write a ZIP archive containing the CSV
    #[arg(long, default_value_t = false)]
    pub compress: bool,

    /// Output CSV path (default derived from exchange, symbol and dates)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Replace the output file if it already exists
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Print the exchanges that trade this symbol
    #[arg(long, value_name = "SYMBOL")]
    pub find_exchanges_for_symbol: Option<String>,

    /// Print the symbols currently trading on this exchange
    #[arg(long, value_name = "EXCHANGE")]
    pub list_symbols_for_exchange: Option<String>,
}

/// The single operation an invocation performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Find exchanges listing a symbol
    FindExchanges(String),
    /// List symbols of an exchange
    ListSymbols(String),
    /// Download candles
    Download(DownloadRequest),
    /// Nothing to do; print usage
    Help,
}

impl Mode {
    /// Exchange identifier the mode targets, if it names one
    pub fn exchange(&self) -> Option<&str> {
        match self {
            Self::ListSymbols(exchange) => Some(exchange),
            Self::Download(request) => Some(&request.exchange),
            Self::FindExchanges(_) | Self::Help => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Cli {
    /// Effective `until` value: `current` when `--current` is set or `--until` is blank
    pub fn effective_until(&self) -> String {
        match non_empty(&self.until) {
            Some(until) if !self.current => until.to_string(),
            _ => CURRENT.to_string(),
        }
    }

    /// Decide what this invocation does
    ///
    /// Finder wins over lister, lister wins over download. A download needs
    /// exchange, symbol and since; anything less falls through to help.
    pub fn mode(&self) -> Mode {
        if let Some(symbol) = non_empty(&self.find_exchanges_for_symbol) {
            return Mode::FindExchanges(symbol.to_string());
        }
        if let Some(exchange) = non_empty(&self.list_symbols_for_exchange) {
            return Mode::ListSymbols(exchange.to_string());
        }

        match (
            non_empty(&self.exchange),
            non_empty(&self.symbol),
            non_empty(&self.since),
        ) {
            (Some(exchange), Some(symbol), Some(since)) => {
                let until = self.effective_until();
                let output = self
                    .output
                    .clone()
                    .filter(|path| !path.as_os_str().is_empty())
                    .unwrap_or_else(|| {
                        PathBuf::from(default_output_name(exchange, symbol, since, &until))
                    });

                Mode::Download(
                    DownloadRequest::new(exchange, symbol, since, until, output)
                        .with_compress(self.compress)
                        .with_overwrite(self.force),
                )
            }
            _ => Mode::Help,
        }
    }

    /// Run the selected operation against the built-in exchanges
    ///
    /// An unknown exchange is reported before the `--proxy` URL is looked at.
    ///
    /// # Errors
    /// Any failure of the selected operation, or an invalid `--proxy` URL.
    pub async fn run(&self, out: &mut impl Write) -> Result<(), CliError> {
        let mode = self.mode();
        if mode == Mode::Help {
            return run_mode(mode, &ExchangeRegistry::empty(), ProgressBar::hidden(), out).await;
        }

        if let Some(exchange) = mode.exchange() {
            ExchangeRegistry::builtin(None)?.resolve(exchange)?;
        }

        let registry = ExchangeRegistry::builtin(non_empty(&self.proxy))?;
        let progress = match mode {
            Mode::Download(_) => create_progress_bar(),
            _ => ProgressBar::hidden(),
        };
        run_mode(mode, &registry, progress, out).await
    }
}

/// Run a mode against `registry`, writing results to `out` one per line
///
/// # Errors
/// Any failure of the selected operation, or a failed write to `out`.
pub async fn run_mode(
    mode: Mode,
    registry: &ExchangeRegistry,
    progress: ProgressBar,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match mode {
        Mode::FindExchanges(symbol) => {
            let exchanges = find_exchanges_for_symbol(registry, &symbol).await?;
            for exchange in exchanges {
                writeln!(out, "{exchange}")?;
            }
        }
        Mode::ListSymbols(exchange) => {
            let symbols = list_symbols_for_exchange(registry, &exchange).await?;
            for symbol in symbols {
                writeln!(out, "{symbol}")?;
            }
        }
        Mode::Download(request) => {
            if request.output_path.is_dir() {
                return Err(CliError::InvalidArgument(format!(
                    "output path {} is a directory",
                    request.output_path.display()
                )));
            }
            let summary = DownloadExecutor::new(registry)
                .with_progress(progress)
                .execute(&request)
                .await?;
            info!(
                pages = summary.pages_fetched,
                candles = summary.candles_written,
                "Saved"
            );
            writeln!(out, "Saved: {}", summary.output_path.display())?;
        }
        Mode::Help => {
            Cli::command().write_help(out)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Progress bar on stderr for candle downloads
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} candles ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
