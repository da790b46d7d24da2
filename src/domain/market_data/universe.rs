use super::value_objects::MarketSymbol;

/// Quote currency every built-in market is priced in.
pub const DEFAULT_QUOTE_CURRENCY: &str = "EUR";

/// Base assets shown on the board, in display-seed order.
pub const DEFAULT_MARKETS: &[&str] = &[
    "BTC", "ETH", "XRP", "SOL", "ADA", "DOGE", "DOT", "LTC", "LINK", "AVAX", "MATIC", "TRX",
    "XLM", "ATOM", "BCH", "UNI", "ETC", "FIL", "NEAR", "ALGO", "AAVE", "SHIB", "EOS", "XTZ",
    "MANA", "SAND", "APE", "CHZ", "GRT", "BAT",
];

/// Ordered, duplicate-free set of tradable markets quoted in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketUniverse {
    quote: String,
    symbols: Vec<MarketSymbol>,
}

impl MarketUniverse {
    pub fn new<I, S>(quote: &str, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<MarketSymbol> = Vec::new();
        for symbol in symbols {
            let symbol = MarketSymbol::from_wire(symbol.as_ref());
            if !symbol.is_empty() && !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        Self { quote: quote.to_uppercase(), symbols: unique }
    }

    /// Builds a universe from wire names such as `["BTC-EUR", "ETH-EUR"]`.
    ///
    /// The quote currency is taken from the first entry that carries one.
    pub fn from_wire(markets: &[&str]) -> Self {
        let quote = markets
            .iter()
            .find_map(|market| market.split_once('-').map(|(_, quote)| quote))
            .unwrap_or(DEFAULT_QUOTE_CURRENCY);
        Self::new(quote, markets.iter().copied())
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn symbols(&self) -> &[MarketSymbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Wire names for the subscribe request, e.g. `BTC-EUR`.
    pub fn wire_markets(&self) -> Vec<String> {
        self.symbols.iter().map(|symbol| symbol.to_wire(&self.quote)).collect()
    }
}

impl Default for MarketUniverse {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_CURRENCY, DEFAULT_MARKETS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_quoted_in_euro() {
        let universe = MarketUniverse::default();
        assert_eq!(universe.len(), DEFAULT_MARKETS.len());
        assert_eq!(universe.wire_markets()[0], "BTC-EUR");
        assert!(universe.wire_markets().iter().all(|m| m.ends_with("-EUR")));
    }

    #[test]
    fn wire_universe_keeps_order_and_drops_duplicates() {
        let universe = MarketUniverse::from_wire(&["ETH-EUR", "BTC-EUR", "eth-eur"]);
        assert_eq!(universe.quote(), "EUR");
        let symbols: Vec<&str> = universe.symbols().iter().map(|s| s.value()).collect();
        assert_eq!(symbols, vec!["ETH", "BTC"]);
    }
}
