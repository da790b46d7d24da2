//! Feed-independent building blocks: tickers, their store, the projection
//! that turns them into table rows, and the logging and error vocabulary.

pub mod errors;
pub mod feed;
pub mod logging;
pub mod market_data;
pub mod projection;
