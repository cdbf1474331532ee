use crate::{RpcClient, RpcError, RpcTransport};
use ft_api_types::{CurrencyStatsRow, TokenDescriptor, TokenStats};
pub use ft_api_types::DEFAULT_PRECISION;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::debug;

/// Count the decimal digits of the amount part of `"1234.5678 WON"`.
///
/// A supply with no decimal point (`"500 RAW"`) is a zero-precision token.
/// Only a missing or empty supply falls back to [`DEFAULT_PRECISION`].
pub fn infer_precision(supply: Option<&str>) -> u8 {
    let Some(amount) = supply.and_then(|s| s.split_whitespace().next()) else {
        return DEFAULT_PRECISION;
    };
    match amount.split_once('.') {
        Some((_, fraction)) => u8::try_from(fraction.len()).unwrap_or(DEFAULT_PRECISION),
        None => 0,
    }
}

pub fn stats_from_row(row: CurrencyStatsRow) -> TokenStats {
    let precision = infer_precision(row.supply.as_deref());
    TokenStats {
        supply: row.supply.unwrap_or_default(),
        max_supply: row.max_supply.unwrap_or_default(),
        issuer: row.issuer.unwrap_or_default(),
        precision,
    }
}

/// Result of one token's stats request. `Ok(None)` means the chain had no
/// entry for the symbol.
#[derive(Debug, Clone)]
pub struct StatsFetch {
    pub symbol: String,
    pub outcome: Result<Option<TokenStats>, RpcError>,
}

#[derive(Debug, Default)]
pub struct StatsRefresh {
    pub updated: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<(String, RpcError)>,
}

impl StatsRefresh {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsCache {
    entries: HashMap<String, TokenStats>,
}

impl StatsCache {
    pub fn get(&self, symbol: &str) -> Option<&TokenStats> {
        self.entries.get(symbol)
    }

    pub fn precision(&self, symbol: &str) -> u8 {
        self.get(symbol)
            .map(|stats| stats.precision)
            .unwrap_or(DEFAULT_PRECISION)
    }

    pub fn insert(&mut self, symbol: &str, stats: TokenStats) {
        self.entries.insert(symbol.to_owned(), stats);
    }

    /// Merge fetched stats. Missing or failed symbols keep their prior entry.
    pub fn apply(&mut self, fetched: Vec<StatsFetch>) -> StatsRefresh {
        let mut refresh = StatsRefresh::default();
        for StatsFetch { symbol, outcome } in fetched {
            match outcome {
                Ok(Some(stats)) => {
                    self.entries.insert(symbol.clone(), stats);
                    refresh.updated.push(symbol);
                }
                Ok(None) => refresh.missing.push(symbol),
                Err(err) => refresh.failed.push((symbol, err)),
            }
        }
        refresh
    }
}

/// Request stats for every token concurrently.
pub async fn fetch_token_stats<T>(
    client: &RpcClient<T>,
    tokens: &[TokenDescriptor],
) -> Vec<StatsFetch>
where
    T: RpcTransport,
{
    join_all(tokens.iter().map(|token| async move {
        let outcome = client
            .get_currency_stats(&token.contract, &token.symbol)
            .await
            .map(|mut rows| rows.remove(&token.symbol).map(stats_from_row));
        if let Ok(None) = outcome {
            debug!(
                symbol = %token.symbol,
                contract = %token.contract,
                "no currency stats returned"
            );
        }
        StatsFetch {
            symbol: token.symbol.clone(),
            outcome,
        }
    }))
    .await
}
