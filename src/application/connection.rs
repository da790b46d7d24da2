use std::collections::HashMap;

use derive_more::Display;

use crate::application::config::FeedConfig;
use crate::domain::{
    feed::{ConnectionId, FeedTransport, TransportEvent, Visibility},
    logging::LogComponent,
    market_data::{TickerSnapshot, TickerStore, TickerUpdate},
};
use crate::infrastructure::websocket::{
    ErrorReply, FeedEvent, InboundMessage, SubscribeRequest, Ticker24hEntry,
};
use crate::{log_debug, log_error, log_info, log_trace, log_warn};

/// Lifecycle of the streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConnectionState {
    #[display(fmt = "disconnected")]
    Disconnected,
    /// Transport requested; waiting for it to open and acknowledge.
    #[display(fmt = "connecting")]
    Connecting,
    #[display(fmt = "subscribed")]
    Subscribed,
}

/// Callbacks through which the manager publishes store and loading changes.
pub struct FeedHooks {
    on_store_updated: Box<dyn FnMut(TickerSnapshot)>,
    on_loading_changed: Box<dyn FnMut(bool)>,
}

impl FeedHooks {
    pub fn new(
        on_store_updated: impl FnMut(TickerSnapshot) + 'static,
        on_loading_changed: impl FnMut(bool) + 'static,
    ) -> Self {
        Self {
            on_store_updated: Box::new(on_store_updated),
            on_loading_changed: Box::new(on_loading_changed),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {})
    }
}

/// Owns the streaming connection and the ticker store it feeds.
///
/// Every public method is a reaction to one external event and runs to
/// completion; transport outcomes come back later through [`handle_event`].
///
/// [`handle_event`]: ConnectionManager::handle_event
pub struct ConnectionManager<T: FeedTransport> {
    config: FeedConfig,
    transport: T,
    store: TickerStore,
    state: ConnectionState,
    active: Option<ConnectionId>,
    last_id: ConnectionId,
    intentionally_disconnected: bool,
    is_initial_loading: bool,
    hooks: FeedHooks,
}

impl<T: FeedTransport> ConnectionManager<T> {
    pub fn new(config: FeedConfig, transport: T, hooks: FeedHooks) -> Self {
        Self {
            config,
            transport,
            store: TickerStore::new(),
            state: ConnectionState::Disconnected,
            active: None,
            last_id: ConnectionId::new(0),
            intentionally_disconnected: false,
            is_initial_loading: true,
            hooks,
        }
    }

    /// Starts a new connection unless one is already open or opening.
    pub fn open(&mut self) {
        if let Some(id) = self.active {
            log_debug!(LogComponent::Application("Connection"), "open ignored, {id} is {}", self.state);
            return;
        }

        let id = self.last_id.next();
        self.last_id = id;
        self.intentionally_disconnected = false;

        match self.transport.connect(id, &self.config.endpoint) {
            Ok(()) => {
                self.active = Some(id);
                self.state = ConnectionState::Connecting;
                self.set_loading(true);
            }
            Err(e) => {
                log_error!(LogComponent::Application("Connection"), "❌ Could not open {id}: {e}");
                self.state = ConnectionState::Disconnected;
            }
        }
    }

    /// Releases the current connection, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(id) = self.active.take() {
            self.transport.close(id);
            self.state = ConnectionState::Disconnected;
            log_info!(LogComponent::Application("Connection"), "🔌 Closed {id}");
        }
    }

    /// Hidden pages drop the connection; visible pages get one back.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                self.close();
                self.intentionally_disconnected = true;
            }
            Visibility::Visible => {
                if self.active.is_none() {
                    self.open();
                }
            }
        }
    }

    /// Reacts to an event from the transport. Events from connections other
    /// than the active one are dropped.
    pub fn handle_event(&mut self, id: ConnectionId, event: TransportEvent) {
        if self.active != Some(id) {
            log_debug!(LogComponent::Application("Connection"), "dropping {event:?} from stale {id}");
            return;
        }

        match event {
            TransportEvent::Opened => self.subscribe(id),
            TransportEvent::Message(text) => self.dispatch(&text),
            TransportEvent::Error(error) => {
                log_error!(LogComponent::Application("Connection"), "❌ WebSocket error on {id}: {error}");
            }
            TransportEvent::Closed { code, reason } => {
                log_warn!(
                    LogComponent::Application("Connection"),
                    "🔌 {id} closed by transport (code {code:?}): {reason}"
                );
                self.active = None;
                self.state = ConnectionState::Disconnected;
                self.transport.close(id);
            }
        }
    }

    fn subscribe(&mut self, id: ConnectionId) {
        let request = SubscribeRequest::channel(&self.config.channel, self.config.universe.wire_markets());
        match request.to_json().and_then(|json| self.transport.send(id, json)) {
            Ok(()) => {
                log_info!(
                    LogComponent::Application("Connection"),
                    "📡 Subscribing {id} to {} for {} markets",
                    self.config.channel,
                    self.config.universe.len()
                );
            }
            Err(e) => {
                log_error!(LogComponent::Application("Connection"), "❌ Subscribe failed on {id}: {e}");
            }
        }
    }

    fn dispatch(&mut self, text: &str) {
        match InboundMessage::parse(text) {
            Ok(InboundMessage::Event(FeedEvent::Subscribed { subscriptions })) => {
                self.on_subscribed(&subscriptions)
            }
            Ok(InboundMessage::Event(FeedEvent::Ticker24h { data })) => self.on_ticker_batch(&data),
            Ok(InboundMessage::Event(FeedEvent::Unknown)) => {
                log_debug!(LogComponent::Application("Connection"), "ignoring event: {text}");
            }
            Ok(InboundMessage::Error(ErrorReply { action, error_code, error })) => {
                log_warn!(
                    LogComponent::Application("Connection"),
                    "⚠️ Server rejected {}: {error} ({error_code})",
                    action.as_deref().unwrap_or("request")
                );
            }
            Err(e) => {
                log_warn!(LogComponent::Application("Connection"), "⚠️ {e}");
            }
        }
    }

    fn on_subscribed(&mut self, subscriptions: &HashMap<String, Vec<String>>) {
        let confirmed = subscriptions.get(&self.config.channel).map_or(0, Vec::len);
        if confirmed < self.config.universe.len() {
            log_warn!(
                LogComponent::Application("Connection"),
                "⚠️ Server confirmed {confirmed} of {} markets on {}",
                self.config.universe.len(),
                self.config.channel
            );
        }

        self.store.reset(&self.config.universe);
        self.state = ConnectionState::Subscribed;
        log_info!(
            LogComponent::Application("Connection"),
            "✅ Subscribed, seeded {} markets",
            self.store.len()
        );
        (self.hooks.on_store_updated)(self.store.snapshot());
    }

    fn on_ticker_batch(&mut self, entries: &[Ticker24hEntry]) {
        if entries.is_empty() {
            return;
        }

        let updates: Vec<TickerUpdate> =
            entries.iter().filter_map(Ticker24hEntry::to_domain_update).collect();
        let mut outcome = self.store.apply_batch(&updates);
        outcome.skipped += entries.len() - updates.len();
        if outcome.skipped > 0 {
            log_trace!(
                LogComponent::Application("Connection"),
                "skipped {} updates without a known market",
                outcome.skipped
            );
        }
        if outcome.applied > 0 {
            (self.hooks.on_store_updated)(self.store.snapshot());
        }
        self.set_loading(false);
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_initial_loading != loading {
            self.is_initial_loading = loading;
            (self.hooks.on_loading_changed)(loading);
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_intentionally_disconnected(&self) -> bool {
        self.intentionally_disconnected
    }

    pub fn is_initial_loading(&self) -> bool {
        self.is_initial_loading
    }

    pub fn store(&self) -> &TickerStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::market_data::{MarketSymbol, MarketUniverse};
    use crate::infrastructure::memory::{RecordingTransport, TransportCall};

    const ACK: &str = r#"{"event":"subscribed","subscriptions":{"ticker24h":["BTC-EUR","ETH-EUR"]}}"#;

    fn config() -> FeedConfig {
        FeedConfig::default().with_universe(MarketUniverse::from_wire(&["BTC-EUR", "ETH-EUR"]))
    }

    fn manager() -> (ConnectionManager<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        (ConnectionManager::new(config(), transport.clone(), FeedHooks::noop()), transport)
    }

    fn subscribed() -> (ConnectionManager<RecordingTransport>, RecordingTransport, ConnectionId) {
        let (mut manager, transport) = manager();
        manager.open();
        let id = manager.active_connection().unwrap();
        manager.handle_event(id, TransportEvent::Opened);
        manager.handle_event(id, TransportEvent::Message(ACK.into()));
        (manager, transport, id)
    }

    fn batch(entries: &str) -> TransportEvent {
        TransportEvent::Message(format!(r#"{{"event":"ticker24h","data":[{entries}]}}"#))
    }

    #[test]
    fn open_connects_and_sends_subscribe_once_opened() {
        let (mut manager, transport) = manager();
        manager.open();
        assert_eq!(manager.state(), ConnectionState::Connecting);
        assert!(transport.sent().is_empty());

        let id = manager.active_connection().unwrap();
        manager.handle_event(id, TransportEvent::Opened);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        let json: serde_json::Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(json["action"], "subscribe");
        assert_eq!(json["channels"][0]["name"], "ticker24h");
        assert_eq!(json["channels"][0]["markets"], serde_json::json!(["BTC-EUR", "ETH-EUR"]));
    }

    #[test]
    fn open_while_active_is_ignored() {
        let (mut manager, transport) = manager();
        manager.open();
        manager.open();
        assert_eq!(transport.connects().len(), 1);
    }

    #[test]
    fn refused_connect_stays_disconnected() {
        let (mut manager, transport) = manager();
        transport.refuse_connect(true);
        manager.open();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.is_open());

        transport.refuse_connect(false);
        manager.open();
        assert_eq!(manager.state(), ConnectionState::Connecting);
    }

    #[test]
    fn acknowledgement_seeds_store_and_keeps_loading() {
        let (manager, _, _) = subscribed();
        assert_eq!(manager.state(), ConnectionState::Subscribed);
        assert!(manager.is_initial_loading());
        assert_eq!(manager.store().len(), 2);

        let btc = manager.store().get(&MarketSymbol::from("BTC")).unwrap();
        assert_eq!(btc.quote.ask.as_deref(), Some("0.00"));
        assert_eq!(btc.quote.last, None);
    }

    #[test]
    fn batch_overwrites_fields_and_clears_loading() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(
            id,
            batch(r#"{"market":"BTC-EUR","last":"50000","volumeQuote":"1000000","ask":"50010","bid":"49990","open":"49000"}"#),
        );

        assert!(!manager.is_initial_loading());
        let btc = manager.store().get(&MarketSymbol::from("BTC")).unwrap();
        assert_eq!(btc.quote.last.as_deref(), Some("50000"));
        assert_eq!(btc.quote.open.as_deref(), Some("49000"));
        let eth = manager.store().get(&MarketSymbol::from("ETH")).unwrap();
        assert_eq!(eth.quote.last, None);
    }

    #[test]
    fn empty_batch_keeps_loading() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(id, batch(""));
        assert!(manager.is_initial_loading());
    }

    #[test]
    fn unknown_markets_are_skipped_silently() {
        let (mut manager, _, id) = subscribed();
        let version = manager.store().version();
        manager.handle_event(id, batch(r#"{"market":"XYZ-EUR","last":"1"}"#));
        assert_eq!(manager.store().version(), version);
        assert_eq!(manager.store().len(), 2);
    }

    #[test]
    fn entries_without_market_are_skipped_without_dropping_the_batch() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(id, batch(r#"{"market":"BTC-EUR","last":"1"},{"last":"2"}"#));

        assert!(!manager.is_initial_loading());
        let btc = manager.store().get(&MarketSymbol::from("BTC")).unwrap();
        assert_eq!(btc.quote.last.as_deref(), Some("1"));
        let eth = manager.store().get(&MarketSymbol::from("ETH")).unwrap();
        assert_eq!(eth.quote.last, None);
    }

    #[test]
    fn loading_never_reverts_within_a_connection() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(id, batch(r#"{"market":"BTC-EUR","last":"1"}"#));
        manager.handle_event(id, batch(""));
        manager.handle_event(id, TransportEvent::Message(r#"{"event":"candle"}"#.into()));
        manager.handle_event(id, TransportEvent::Error("boom".into()));
        assert!(!manager.is_initial_loading());
    }

    #[test]
    fn hooks_see_store_and_loading_changes() {
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let loading = Rc::new(RefCell::new(Vec::new()));
        let hooks = {
            let snapshots = Rc::clone(&snapshots);
            let loading = Rc::clone(&loading);
            FeedHooks::new(
                move |snapshot| snapshots.borrow_mut().push(snapshot.version()),
                move |flag| loading.borrow_mut().push(flag),
            )
        };
        let mut manager = ConnectionManager::new(config(), RecordingTransport::new(), hooks);
        manager.open();
        let id = manager.active_connection().unwrap();
        manager.handle_event(id, TransportEvent::Opened);
        manager.handle_event(id, TransportEvent::Message(ACK.into()));
        manager.handle_event(id, batch(r#"{"market":"ETH-EUR","last":"3000"}"#));

        assert_eq!(snapshots.borrow().len(), 2);
        assert_eq!(*loading.borrow(), vec![false]);
    }

    #[test]
    fn transport_error_takes_no_action() {
        let (mut manager, transport, id) = subscribed();
        transport.clear();
        manager.handle_event(id, TransportEvent::Error("network down".into()));
        assert_eq!(manager.state(), ConnectionState::Subscribed);
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn server_close_disconnects_without_retry() {
        let (mut manager, transport, id) = subscribed();
        manager.handle_event(id, TransportEvent::Closed { code: Some(1006), reason: String::new() });
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.is_open());
        assert_eq!(transport.connects().len(), 1);
    }

    #[test]
    fn hidden_closes_and_visible_reopens_without_reset() {
        let (mut manager, transport, id) = subscribed();
        manager.handle_event(id, batch(r#"{"market":"BTC-EUR","last":"50000"}"#));

        manager.set_visibility(Visibility::Hidden);
        assert!(manager.is_intentionally_disconnected());
        assert_eq!(transport.closes(), vec![id]);

        manager.set_visibility(Visibility::Visible);
        let reopened = manager.active_connection().unwrap();
        assert_ne!(reopened, id);
        manager.handle_event(reopened, TransportEvent::Opened);

        assert_eq!(transport.sent().len(), 2);
        let btc = manager.store().get(&MarketSymbol::from("BTC")).unwrap();
        assert_eq!(btc.quote.last.as_deref(), Some("50000"));
    }

    #[test]
    fn hidden_twice_closes_once() {
        let (mut manager, transport, _) = subscribed();
        manager.set_visibility(Visibility::Hidden);
        manager.set_visibility(Visibility::Hidden);
        manager.close();
        assert_eq!(transport.closes().len(), 1);
    }

    #[test]
    fn stale_events_are_ignored() {
        let (mut manager, transport, old) = subscribed();
        manager.set_visibility(Visibility::Hidden);
        manager.set_visibility(Visibility::Visible);
        let current = manager.active_connection().unwrap();

        manager.handle_event(old, TransportEvent::Closed { code: Some(1000), reason: "bye".into() });
        assert_eq!(manager.active_connection(), Some(current));

        manager.handle_event(old, batch(r#"{"market":"BTC-EUR","last":"1"}"#));
        assert!(manager.is_initial_loading());
        assert!(transport.calls().iter().all(|call| !matches!(call, TransportCall::Send { id, .. } if *id == current)));
    }

    #[test]
    fn repeated_acknowledgement_resets_store_but_not_loading() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(id, batch(r#"{"market":"BTC-EUR","last":"50000"}"#));
        assert!(!manager.is_initial_loading());

        manager.handle_event(id, TransportEvent::Message(ACK.into()));
        assert!(!manager.is_initial_loading());
        assert_eq!(manager.store().get(&MarketSymbol::from("BTC")).unwrap().quote.last, None);
    }

    #[test]
    fn reopening_rearms_loading_until_the_next_batch() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(id, batch(r#"{"market":"BTC-EUR","last":"50000"}"#));
        assert!(!manager.is_initial_loading());

        manager.set_visibility(Visibility::Hidden);
        assert!(!manager.is_initial_loading());
        manager.set_visibility(Visibility::Visible);
        assert!(manager.is_initial_loading());

        let reopened = manager.active_connection().unwrap();
        manager.handle_event(reopened, TransportEvent::Opened);
        manager.handle_event(reopened, TransportEvent::Message(ACK.into()));
        assert!(manager.is_initial_loading());
        manager.handle_event(reopened, batch(r#"{"market":"ETH-EUR","last":"3000"}"#));
        assert!(!manager.is_initial_loading());
    }

    #[test]
    fn error_replies_and_garbage_are_tolerated() {
        let (mut manager, _, id) = subscribed();
        manager.handle_event(
            id,
            TransportEvent::Message(r#"{"action":"subscribe","errorCode":205,"error":"bad market"}"#.into()),
        );
        manager.handle_event(id, TransportEvent::Message("not json".into()));
        assert_eq!(manager.state(), ConnectionState::Subscribed);
    }
}
