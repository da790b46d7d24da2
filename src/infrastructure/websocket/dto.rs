use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{FeedError, FeedResult};
use crate::domain::market_data::{MarketSymbol, TickerQuote, TickerUpdate};

/// Name of the only channel the board subscribes to.
pub const TICKER_CHANNEL: &str = "ticker24h";

/// DTO for the outbound subscribe request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    pub action: String,
    pub channels: Vec<ChannelSubscription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSubscription {
    pub name: String,
    pub markets: Vec<String>,
}

impl SubscribeRequest {
    pub fn channel(name: &str, markets: Vec<String>) -> Self {
        Self {
            action: "subscribe".to_string(),
            channels: vec![ChannelSubscription { name: name.to_string(), markets }],
        }
    }

    pub fn to_json(&self) -> FeedResult<String> {
        serde_json::to_string(self)
            .map_err(|e| FeedError::Encode(format!("subscribe request: {e}")))
    }
}

/// DTO for one market entry of a `ticker24h` event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hEntry {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub volume_quote: Option<String>,
    #[serde(default)]
    pub ask: Option<String>,
    #[serde(default)]
    pub bid: Option<String>,
    #[serde(default)]
    pub open: Option<String>,
}

impl Ticker24hEntry {
    /// Converts the DTO into a domain update keyed by the stripped symbol.
    /// Entries without a market cannot be keyed and yield `None`.
    pub fn to_domain_update(&self) -> Option<TickerUpdate> {
        let market = self.market.as_deref()?;
        Some(TickerUpdate::new(
            MarketSymbol::from_wire(market),
            TickerQuote {
                last: self.last.clone(),
                volume_quote: self.volume_quote.clone(),
                ask: self.ask.clone(),
                bid: self.bid.clone(),
                open: self.open.clone(),
            },
        ))
    }
}

/// Server messages tagged by their `event` field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event")]
pub enum FeedEvent {
    #[serde(rename = "subscribed")]
    Subscribed {
        #[serde(default)]
        subscriptions: HashMap<String, Vec<String>>,
    },
    #[serde(rename = "ticker24h")]
    Ticker24h {
        #[serde(default)]
        data: Vec<Ticker24hEntry>,
    },
    #[serde(other)]
    Unknown,
}

/// DTO for error replies, which carry no `event` field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReply {
    #[serde(default)]
    pub action: Option<String>,
    pub error_code: i64,
    pub error: String,
}

/// Anything the server may push on the socket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InboundMessage {
    Event(FeedEvent),
    Error(ErrorReply),
}

impl InboundMessage {
    pub fn parse(text: &str) -> FeedResult<Self> {
        serde_json::from_str(text).map_err(|e| FeedError::Protocol(format!("inbound message: {e}")))
    }
}
