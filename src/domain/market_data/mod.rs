//! Market data aggregate: symbols, raw tickers, the universe they come from,
//! the store that holds them and the change calculator.

pub mod change;
pub mod entities;
pub mod store;
pub mod universe;
pub mod value_objects;

pub use change::compute_change;
pub use entities::*;
pub use store::{BatchOutcome, TickerSnapshot, TickerStore};
pub use universe::MarketUniverse;
pub use value_objects::*;
