//! Ticker autocomplete: curated list first, live provider lookup on miss.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::fallback::Attempt;
use crate::ports::market_data_port::MarketDataPort;

/// Results are capped at this many matches regardless of source.
pub const MAX_MATCHES: usize = 5;

/// Name used when the provider has no display name for a symbol.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerMatch {
    pub symbol: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl TickerMatch {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
        }
    }
}

/// A source consulted by [`resolve_tickers`]. `query` is already upper-cased.
#[async_trait]
pub trait TickerSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, query: &str) -> Attempt<Vec<TickerMatch>>;
}

/// Static, in-memory list of well-known tickers in stored order.
#[derive(Debug, Clone)]
pub struct CuratedList {
    entries: Vec<TickerMatch>,
}

impl CuratedList {
    pub fn new(entries: Vec<TickerMatch>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| TickerMatch::new(e.symbol.trim().to_uppercase(), e.display_name))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to [`MAX_MATCHES`] entries whose symbol contains `query`.
    pub fn matches(&self, query: &str) -> Vec<TickerMatch> {
        self.entries
            .iter()
            .filter(|e| e.symbol.contains(query))
            .take(MAX_MATCHES)
            .cloned()
            .collect()
    }
}

impl Default for CuratedList {
    fn default() -> Self {
        let entries = DEFAULT_TICKERS
            .iter()
            .map(|(symbol, name)| TickerMatch::new(*symbol, *name))
            .collect();
        Self { entries }
    }
}

#[async_trait]
impl TickerSource for CuratedList {
    fn name(&self) -> &'static str {
        "curated"
    }

    async fn lookup(&self, query: &str) -> Attempt<Vec<TickerMatch>> {
        let found = self.matches(query);
        if found.is_empty() {
            Attempt::Next("no curated symbol matches".to_string())
        } else {
            Attempt::Hit(found)
        }
    }
}

/// Live provider search plus one display-name lookup per symbol.
pub struct ProviderLookup<'a>(pub &'a dyn MarketDataPort);

#[async_trait]
impl TickerSource for ProviderLookup<'_> {
    fn name(&self) -> &'static str {
        "provider"
    }

    async fn lookup(&self, query: &str) -> Attempt<Vec<TickerMatch>> {
        let symbols = match self.0.search_symbols(query).await {
            Ok(symbols) => symbols,
            Err(e) => return Attempt::Next(e.to_string()),
        };

        let mut found = Vec::with_capacity(MAX_MATCHES);
        for symbol in symbols.into_iter().take(MAX_MATCHES) {
            let name = match self.0.display_name(&symbol).await {
                Ok(Some(name)) if !name.trim().is_empty() => name,
                Ok(_) => UNKNOWN_NAME.to_string(),
                Err(e) => {
                    debug!(%symbol, error = %e, "display name lookup failed");
                    UNKNOWN_NAME.to_string()
                }
            };
            found.push(TickerMatch::new(symbol, name));
        }
        Attempt::Hit(found)
    }
}

/// Resolve autocomplete suggestions. Never fails; an empty query yields nothing.
pub async fn resolve_tickers(
    curated: &CuratedList,
    market_data: &dyn MarketDataPort,
    query: &str,
) -> Vec<TickerMatch> {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        return Vec::new();
    }

    let provider = ProviderLookup(market_data);
    let sources: [&dyn TickerSource; 2] = [curated, &provider];
    for source in sources {
        match source.lookup(&query).await {
            Attempt::Hit(mut found) => {
                found.truncate(MAX_MATCHES);
                debug!(%query, source = source.name(), count = found.len(), "tickers resolved");
                return found;
            }
            Attempt::Next(reason) => {
                debug!(%query, source = source.name(), %reason, "ticker source missed");
            }
        }
    }
    warn!(%query, "no ticker source produced suggestions");
    Vec::new()
}

const DEFAULT_TICKERS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc. Class A"),
    ("GOOG", "Alphabet Inc. Class C"),
    ("AMZN", "Amazon.com, Inc."),
    ("META", "Meta Platforms, Inc."),
    ("TSLA", "Tesla, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("BRK-B", "Berkshire Hathaway Inc."),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
    ("MA", "Mastercard Incorporated"),
    ("JNJ", "Johnson & Johnson"),
    ("WMT", "Walmart Inc."),
    ("PG", "The Procter & Gamble Company"),
    ("UNH", "UnitedHealth Group Incorporated"),
    ("HD", "The Home Depot, Inc."),
    ("DIS", "The Walt Disney Company"),
    ("BAC", "Bank of America Corporation"),
    ("XOM", "Exxon Mobil Corporation"),
    ("KO", "The Coca-Cola Company"),
    ("PEP", "PepsiCo, Inc."),
    ("NFLX", "Netflix, Inc."),
    ("INTC", "Intel Corporation"),
    ("AMD", "Advanced Micro Devices, Inc."),
    ("CSCO", "Cisco Systems, Inc."),
    ("ORCL", "Oracle Corporation"),
    ("CRM", "Salesforce, Inc."),
    ("ADBE", "Adobe Inc."),
    ("NKE", "NIKE, Inc."),
    ("PYPL", "PayPal Holdings, Inc."),
    ("UBER", "Uber Technologies, Inc."),
    ("SPY", "SPDR S&P 500 ETF Trust"),
    ("QQQ", "Invesco QQQ Trust"),
];
