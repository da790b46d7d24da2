use std::time::Duration;

use crate::domain::market_data::MarketUniverse;
use crate::infrastructure::websocket::TICKER_CHANNEL;

/// Public market-data endpoint the board streams from.
pub const DEFAULT_ENDPOINT: &str = "wss://ws.bitvavo.com/v2/";

/// Quiet time a search term must stay unchanged before it is applied.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Everything the feed needs to know up front. Built-in defaults only; the
/// `with_*` methods exist for tests and embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub endpoint: String,
    pub channel: String,
    pub universe: MarketUniverse,
    pub search_debounce: Duration,
}

impl FeedConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_universe(mut self, universe: MarketUniverse) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search_debounce = quiet;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            channel: TICKER_CHANNEL.to_string(),
            universe: MarketUniverse::default(),
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
        }
    }
}
