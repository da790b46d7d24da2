use std::sync::Arc;

use leptos::*;
use once_cell::sync::OnceCell;

use crate::domain::projection::{DisplayRow, OrderBy};

/// Reactive mirror of the latest [`MarketView`](crate::application::MarketView)
/// plus the raw search box contents.
pub struct Globals {
    pub rows: RwSignal<Arc<[DisplayRow]>>,
    pub is_initial_loading: RwSignal<bool>,
    pub order_by: RwSignal<OrderBy>,
    pub search_input: RwSignal<String>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        rows: create_rw_signal(Arc::from(Vec::new())),
        is_initial_loading: create_rw_signal(true),
        order_by: create_rw_signal(OrderBy::default()),
        search_input: create_rw_signal(String::new()),
    })
}
