pub use super::value_objects::{MarketSymbol, TickerQuote};
use serde::{Deserialize, Serialize};

/// Domain entity - one row of the ticker store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTicker {
    pub market: MarketSymbol,
    pub quote: TickerQuote,
}

impl RawTicker {
    pub fn new(market: MarketSymbol, quote: TickerQuote) -> Self {
        Self { market, quote }
    }

    /// Row as it exists right after a subscription acknowledgement.
    pub fn seeded(market: MarketSymbol) -> Self {
        Self::new(market, TickerQuote::seeded())
    }
}

/// One per-market entry of an update batch, already keyed by stripped symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerUpdate {
    pub market: MarketSymbol,
    pub quote: TickerQuote,
}

impl TickerUpdate {
    pub fn new(market: MarketSymbol, quote: TickerQuote) -> Self {
        Self { market, quote }
    }
}
