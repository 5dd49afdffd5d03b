//! Symbol listing and exchange lookup

use crate::fetcher::FetcherResult;
use crate::registry::ExchangeRegistry;
use tracing::{debug, info, warn};

/// Trading pairs currently tradable on `exchange`, as `BASE/QUOTE`
///
/// Symbols whose status is anything other than `TRADING` are skipped. Order
/// follows the exchange response.
///
/// # Errors
/// - `FetcherError::UnsupportedExchange` for an unknown exchange (no network call)
/// - `FetcherError::Transport` / `FetcherError::Decode` from the exchange
pub async fn list_symbols_for_exchange(
    registry: &ExchangeRegistry,
    exchange: &str,
) -> FetcherResult<Vec<String>> {
    let fetcher = registry.resolve(exchange)?;
    let records = fetcher.list_symbols().await?;
    let total = records.len();

    let pairs: Vec<String> = records
        .iter()
        .filter(|record| record.is_trading())
        .map(|record| record.pair())
        .collect();

    info!(
        exchange = fetcher.name(),
        total = total,
        trading = pairs.len(),
        "Listed symbols"
    );
    Ok(pairs)
}

/// Exchanges whose trading pairs include `symbol`
///
/// The query is compared in upper case against each exchange's `BASE/QUOTE`
/// trading pairs. Exchanges are queried one after another in registration
/// order.
///
/// # Errors
/// The first transport or decode failure from any exchange aborts the lookup.
pub async fn find_exchanges_for_symbol(
    registry: &ExchangeRegistry,
    symbol: &str,
) -> FetcherResult<Vec<String>> {
    let wanted = symbol.trim().to_uppercase();
    let mut found = Vec::new();

    for (name, _) in registry.iter() {
        let pairs = list_symbols_for_exchange(registry, name).await?;
        if pairs.iter().any(|pair| *pair == wanted) {
            debug!(exchange = name, symbol = %wanted, "Symbol found");
            found.push(name.to_string());
        }
    }

    if found.is_empty() {
        warn!(symbol = %wanted, "No exchange trades this symbol");
    }
    Ok(found)
}
