use std::collections::HashMap;
use std::sync::Arc;

use super::entities::{RawTicker, TickerUpdate};
use super::universe::MarketUniverse;
use super::value_objects::MarketSymbol;

/// Result of merging one update batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub skipped: usize,
}

/// Immutable view of the store at one version.
///
/// Cloning is cheap; the rows are shared until the store mutates again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSnapshot {
    version: u64,
    rows: Arc<Vec<RawTicker>>,
}

impl TickerSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rows(&self) -> &[RawTicker] {
        &self.rows
    }

    pub fn get(&self, market: &MarketSymbol) -> Option<&RawTicker> {
        self.rows.iter().find(|row| &row.market == market)
    }
}

impl Default for TickerSnapshot {
    fn default() -> Self {
        Self { version: 0, rows: Arc::new(Vec::new()) }
    }
}

/// Keyed table of raw tickers, one row per market, in universe order.
///
/// Rows are only ever added in bulk by [`TickerStore::reset`] and changed in
/// place by [`TickerStore::apply_batch`]; nothing removes a single row.
#[derive(Debug, Default)]
pub struct TickerStore {
    rows: Arc<Vec<RawTicker>>,
    index: HashMap<MarketSymbol, usize>,
    version: u64,
}

impl TickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every row with a freshly seeded one per universe market.
    pub(crate) fn reset(&mut self, universe: &MarketUniverse) {
        let rows: Vec<RawTicker> =
            universe.symbols().iter().cloned().map(RawTicker::seeded).collect();
        self.index =
            rows.iter().enumerate().map(|(position, row)| (row.market.clone(), position)).collect();
        self.rows = Arc::new(rows);
        self.version += 1;
    }

    /// Overwrites the quote of every row named in `batch`, in batch order.
    ///
    /// Entries for markets the store does not know are skipped.
    pub(crate) fn apply_batch(&mut self, batch: &[TickerUpdate]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        if batch.is_empty() {
            return outcome;
        }

        let rows = Arc::make_mut(&mut self.rows);
        for update in batch {
            match self.index.get(&update.market) {
                Some(&position) => {
                    rows[position].quote = update.quote.clone();
                    outcome.applied += 1;
                }
                None => outcome.skipped += 1,
            }
        }

        if outcome.applied > 0 {
            self.version += 1;
        }
        outcome
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rows(&self) -> &[RawTicker] {
        &self.rows
    }

    pub fn get(&self, market: &MarketSymbol) -> Option<&RawTicker> {
        self.index.get(market).map(|&position| &self.rows[position])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn snapshot(&self) -> TickerSnapshot {
        TickerSnapshot { version: self.version, rows: Arc::clone(&self.rows) }
    }
}
