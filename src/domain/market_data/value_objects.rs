use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};

/// Value Object - base asset symbol, always uppercase (`BTC`, `ETH`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, Serialize, Deserialize)]
pub struct MarketSymbol(String);

impl MarketSymbol {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err("Market symbol cannot be empty".to_string());
        }
        Ok(Self(symbol.to_uppercase()))
    }

    /// Strips the quote currency from a wire market name: `BTC-EUR` -> `BTC`.
    pub fn from_wire(market: &str) -> Self {
        let base = market.split('-').next().unwrap_or(market);
        Self(base.trim().to_uppercase())
    }

    /// Wire market name for this symbol quoted in `quote`.
    pub fn to_wire(&self, quote: &str) -> String {
        format!("{}-{}", self.0, quote.to_uppercase())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MarketSymbol {
    fn from(value: &str) -> Self {
        Self::from_wire(value)
    }
}

/// Value Object - the five raw numeric-as-text fields carried per market.
///
/// Every field is nullable; the feed sends strings so nothing is parsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub last: Option<String>,
    pub volume_quote: Option<String>,
    pub ask: Option<String>,
    pub bid: Option<String>,
    pub open: Option<String>,
}

impl TickerQuote {
    /// Zero ask used until the first update arrives.
    pub const ZERO_ASK: &'static str = "0.00";

    /// Quote of a freshly seeded row: everything null except the zero ask.
    pub fn seeded() -> Self {
        Self { ask: Some(Self::ZERO_ASK.to_string()), ..Self::default() }
    }
}
