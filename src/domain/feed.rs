//! Ports between the connection manager and whatever carries the stream.

use std::rc::Rc;

use derive_more::Display;
use strum::{AsRefStr, EnumString};

use crate::domain::errors::FeedResult;

/// Identifies one physical connection attempt.
///
/// A new id is handed out for every open so that events still in flight from
/// a previous socket can be told apart and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "#{}", _0)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// Something that happened on a connection, delivered after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed { code: Option<u16>, reason: String },
}

/// Receives every event of every connection a transport opened.
pub type EventSink = Rc<dyn Fn(ConnectionId, TransportEvent)>;

/// Page visibility as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum Visibility {
    #[strum(serialize = "visible")]
    #[display(fmt = "visible")]
    Visible,
    #[strum(serialize = "hidden")]
    #[display(fmt = "hidden")]
    Hidden,
}

/// Fire-and-forget transport driven by the connection manager.
///
/// Implementations never call back synchronously; outcomes of `connect`,
/// `send` and `close` arrive later as [`TransportEvent`]s tagged with the
/// [`ConnectionId`] they belong to.
pub trait FeedTransport {
    /// Starts opening a connection to `endpoint`.
    fn connect(&mut self, id: ConnectionId, endpoint: &str) -> FeedResult<()>;

    /// Queues a text frame on connection `id`.
    fn send(&mut self, id: ConnectionId, text: String) -> FeedResult<()>;

    /// Releases connection `id`. Closing an unknown or finished id is a no-op.
    fn close(&mut self, id: ConnectionId);
}
