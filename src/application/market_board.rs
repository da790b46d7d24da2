use std::sync::Arc;

use crate::domain::{
    logging::LogComponent,
    market_data::TickerSnapshot,
    projection::{DisplayRow, OrderBy, ProjectionEngine, SortField},
};
use crate::log_debug;

/// What the presentation layer gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketView {
    pub rows: Arc<[DisplayRow]>,
    pub is_initial_loading: bool,
    pub order_by: OrderBy,
}

/// Holds the inputs of the projection and hands out memoized views.
#[derive(Debug)]
pub struct MarketBoard {
    snapshot: TickerSnapshot,
    is_initial_loading: bool,
    term: String,
    order_by: OrderBy,
    engine: ProjectionEngine,
}

impl Default for MarketBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketBoard {
    pub fn new() -> Self {
        Self {
            snapshot: TickerSnapshot::default(),
            is_initial_loading: true,
            term: String::new(),
            order_by: OrderBy::default(),
            engine: ProjectionEngine::new(),
        }
    }

    pub fn replace_store(&mut self, snapshot: TickerSnapshot) {
        self.snapshot = snapshot;
    }

    pub fn set_initial_loading(&mut self, loading: bool) {
        self.is_initial_loading = loading;
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.term != term {
            log_debug!(LogComponent::Application("MarketBoard"), "🔍 search term {term:?}");
            self.term = term.to_string();
        }
    }

    /// Same field flips the direction, a new field starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.order_by = self.order_by.toggled(field);
        log_debug!(
            LogComponent::Application("MarketBoard"),
            "↕️ sorting by {} {}",
            self.order_by.field,
            self.order_by.direction
        );
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    pub fn view(&mut self) -> MarketView {
        MarketView {
            rows: self.engine.project(&self.snapshot, &self.term, self.order_by),
            is_initial_loading: self.is_initial_loading,
            order_by: self.order_by,
        }
    }

    pub fn recomputations(&self) -> u64 {
        self.engine.recomputations()
    }
}
