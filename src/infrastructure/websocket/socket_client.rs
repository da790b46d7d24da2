use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::poll_fn;
use futures::{FutureExt, SinkExt, StreamExt, pin_mut, select};
use gloo_net::websocket::{Message, WebSocketError, futures::WebSocket};
use wasm_bindgen_futures::spawn_local;

use crate::domain::{
    errors::{FeedError, FeedResult},
    feed::{ConnectionId, EventSink, FeedTransport, TransportEvent},
    logging::LogComponent,
};
use crate::{log_debug, log_info};

enum Outbound {
    Text(String),
    Close,
}

/// Browser WebSocket transport based on gloo.
///
/// Each connection runs as its own local task that owns the socket; the
/// transport only keeps a command channel per live connection.
pub struct GlooSocketTransport {
    events: EventSink,
    connections: HashMap<ConnectionId, UnboundedSender<Outbound>>,
}

impl GlooSocketTransport {
    pub fn new(events: EventSink) -> Self {
        Self { events, connections: HashMap::new() }
    }
}

impl FeedTransport for GlooSocketTransport {
    fn connect(&mut self, id: ConnectionId, endpoint: &str) -> FeedResult<()> {
        log_info!(LogComponent::Infrastructure("Socket"), "🔌 Connecting {id} to {endpoint}");

        let ws = WebSocket::open(endpoint)
            .map_err(|e| FeedError::Transport(format!("Failed to open WebSocket: {e}")))?;

        let (commands, receiver) = mpsc::unbounded();
        self.connections.insert(id, commands);
        spawn_local(drive_connection(id, ws, receiver, Rc::clone(&self.events)));
        Ok(())
    }

    fn send(&mut self, id: ConnectionId, text: String) -> FeedResult<()> {
        let commands = self
            .connections
            .get(&id)
            .ok_or_else(|| FeedError::Transport(format!("connection {id} is not open")))?;
        commands
            .unbounded_send(Outbound::Text(text))
            .map_err(|_| FeedError::Transport(format!("connection {id} already finished")))
    }

    fn close(&mut self, id: ConnectionId) {
        if let Some(commands) = self.connections.remove(&id) {
            let _ = commands.unbounded_send(Outbound::Close);
        }
    }
}

/// How the connecting phase of a socket ended.
enum Opening {
    Ready(Result<(), WebSocketError>),
    Failed(Option<Result<Message, WebSocketError>>),
    Cancelled,
}

async fn drive_connection(
    id: ConnectionId,
    ws: WebSocket,
    mut commands: UnboundedReceiver<Outbound>,
    events: EventSink,
) {
    let (mut writer, reader) = ws.split();
    let mut reader = reader.fuse();

    // The sink becomes ready once the browser reports the socket open; a
    // failed handshake only shows up on the read side.
    let opening = {
        let ready = poll_fn(|cx| writer.poll_ready_unpin(cx)).fuse();
        pin_mut!(ready);
        select! {
            result = ready => Opening::Ready(result),
            incoming = reader.next() => Opening::Failed(incoming),
            _ = commands.next() => Opening::Cancelled,
        }
    };

    match opening {
        Opening::Ready(Ok(())) => events(id, TransportEvent::Opened),
        Opening::Ready(Err(e)) | Opening::Failed(Some(Err(e))) => {
            events(id, TransportEvent::Error(e.to_string()));
            events(id, TransportEvent::Closed { code: None, reason: "failed to open".to_string() });
            return;
        }
        Opening::Failed(_) => {
            events(id, TransportEvent::Closed { code: None, reason: "failed to open".to_string() });
            return;
        }
        Opening::Cancelled => {
            log_debug!(LogComponent::Infrastructure("Socket"), "{id} closed before it opened");
            let _ = writer.close().await;
            return;
        }
    }

    loop {
        select! {
            incoming = reader.next() => match incoming {
                Some(Ok(Message::Text(text))) => events(id, TransportEvent::Message(text)),
                Some(Ok(Message::Bytes(bytes))) => {
                    log_debug!(
                        LogComponent::Infrastructure("Socket"),
                        "ignoring {} byte binary frame on {id}",
                        bytes.len()
                    );
                }
                Some(Err(WebSocketError::ConnectionClose(close))) => {
                    events(id, TransportEvent::Closed { code: Some(close.code), reason: close.reason });
                    return;
                }
                Some(Err(e)) => events(id, TransportEvent::Error(e.to_string())),
                None => {
                    events(id, TransportEvent::Closed { code: None, reason: "stream ended".to_string() });
                    return;
                }
            },
            command = commands.next() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = writer.send(Message::Text(text)).await {
                        events(id, TransportEvent::Error(e.to_string()));
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = writer.close().await;
                    log_debug!(LogComponent::Infrastructure("Socket"), "{id} closed");
                    return;
                }
            },
        }
    }
}
