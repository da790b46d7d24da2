use derive_more::Display;

/// Errors raised while talking to the ticker feed.
///
/// None of them are fatal: the feed logs them where they stop propagating and
/// the board keeps showing whatever it already has.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FeedError {
    #[display(fmt = "Transport Error: {}", _0)]
    Transport(String),
    #[display(fmt = "Protocol Error: {}", _0)]
    Protocol(String),
    #[display(fmt = "Encode Error: {}", _0)]
    Encode(String),
    #[display(fmt = "Browser Error: {}", _0)]
    Browser(String),
}

impl std::error::Error for FeedError {}

pub type FeedResult<T> = Result<T, FeedError>;
