pub mod config;
pub mod connection;
pub mod debounce;
pub mod feed;
pub mod market_board;

pub use config::*;
pub use connection::*;
pub use debounce::*;
pub use feed::*;
pub use market_board::*;
