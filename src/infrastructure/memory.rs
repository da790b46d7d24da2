//! In-memory transport that records what the manager asked of it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{
    errors::{FeedError, FeedResult},
    feed::{ConnectionId, FeedTransport},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Connect { id: ConnectionId, endpoint: String },
    Send { id: ConnectionId, text: String },
    Close(ConnectionId),
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<TransportCall>,
    refuse_connect: bool,
}

/// Records every call and never produces events by itself; tests feed
/// events to the manager directly. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `connect` fail until switched back.
    pub fn refuse_connect(&self, refuse: bool) {
        self.inner.borrow_mut().refuse_connect = refuse;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn sent(&self) -> Vec<(ConnectionId, String)> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Send { id, text } => Some((*id, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn connects(&self) -> Vec<ConnectionId> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Connect { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<ConnectionId> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Close(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }
}

impl FeedTransport for RecordingTransport {
    fn connect(&mut self, id: ConnectionId, endpoint: &str) -> FeedResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.refuse_connect {
            return Err(FeedError::Transport(format!("connection to {endpoint} refused")));
        }
        inner.calls.push(TransportCall::Connect { id, endpoint: endpoint.to_string() });
        Ok(())
    }

    fn send(&mut self, id: ConnectionId, text: String) -> FeedResult<()> {
        self.inner.borrow_mut().calls.push(TransportCall::Send { id, text });
        Ok(())
    }

    fn close(&mut self, id: ConnectionId) {
        self.inner.borrow_mut().calls.push(TransportCall::Close(id));
    }
}
