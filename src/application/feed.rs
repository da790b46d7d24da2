use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::application::{
    config::FeedConfig,
    connection::{ConnectionManager, ConnectionState, FeedHooks},
    market_board::{MarketBoard, MarketView},
};
use crate::domain::{
    feed::{ConnectionId, EventSink, FeedTransport, TransportEvent, Visibility},
    logging::LogComponent,
    projection::SortField,
};
use crate::log_error;

type ViewCallback = Rc<dyn Fn(&MarketView)>;

/// The running board: a connection manager feeding a [`MarketBoard`], with
/// every new view pushed to a single subscriber.
///
/// The subscriber must not call back into the feed's connection methods
/// (`open`, `close`, `set_visibility`, `handle_event`) synchronously.
pub struct MarketFeed<T: FeedTransport + 'static> {
    manager: Rc<RefCell<ConnectionManager<T>>>,
    board: Rc<RefCell<MarketBoard>>,
    on_view: ViewCallback,
}

impl<T: FeedTransport + 'static> Clone for MarketFeed<T> {
    fn clone(&self) -> Self {
        Self {
            manager: Rc::clone(&self.manager),
            board: Rc::clone(&self.board),
            on_view: Rc::clone(&self.on_view),
        }
    }
}

impl<T: FeedTransport + 'static> MarketFeed<T> {
    /// `make_transport` receives the sink the transport must report its
    /// events to.
    pub fn new(
        config: FeedConfig,
        make_transport: impl FnOnce(EventSink) -> T,
        on_view: impl Fn(&MarketView) + 'static,
    ) -> Self {
        let board = Rc::new(RefCell::new(MarketBoard::new()));
        let on_view: ViewCallback = Rc::new(on_view);

        let hooks = {
            let (store_board, store_view) = (Rc::clone(&board), Rc::clone(&on_view));
            let (loading_board, loading_view) = (Rc::clone(&board), Rc::clone(&on_view));
            FeedHooks::new(
                move |snapshot| {
                    store_board.borrow_mut().replace_store(snapshot);
                    publish(&store_board, &store_view);
                },
                move |loading| {
                    loading_board.borrow_mut().set_initial_loading(loading);
                    publish(&loading_board, &loading_view);
                },
            )
        };

        let manager = Rc::new_cyclic(|weak: &Weak<RefCell<ConnectionManager<T>>>| {
            let weak = weak.clone();
            let sink: EventSink = Rc::new(move |id, event| {
                let Some(manager) = weak.upgrade() else {
                    return;
                };
                match manager.try_borrow_mut() {
                    Ok(mut manager) => manager.handle_event(id, event),
                    Err(_) => {
                        log_error!(
                            LogComponent::Application("MarketFeed"),
                            "❌ {event:?} for {id} arrived while the manager was busy"
                        );
                    }
                }
            });
            RefCell::new(ConnectionManager::new(config, make_transport(sink), hooks))
        });

        Self { manager, board, on_view }
    }

    pub fn open(&self) {
        self.manager.borrow_mut().open();
    }

    pub fn close(&self) {
        self.manager.borrow_mut().close();
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.manager.borrow_mut().set_visibility(visibility);
    }

    pub fn handle_event(&self, id: ConnectionId, event: TransportEvent) {
        self.manager.borrow_mut().handle_event(id, event);
    }

    pub fn set_search_term(&self, term: &str) {
        self.board.borrow_mut().set_search_term(term);
        publish(&self.board, &self.on_view);
    }

    pub fn toggle_sort(&self, field: SortField) {
        self.board.borrow_mut().toggle_sort(field);
        publish(&self.board, &self.on_view);
    }

    pub fn view(&self) -> MarketView {
        self.board.borrow_mut().view()
    }

    /// Quiet period the search box waits for before applying a term.
    pub fn search_debounce(&self) -> Duration {
        self.manager.borrow().config().search_debounce
    }

    pub fn state(&self) -> ConnectionState {
        self.manager.borrow().state()
    }

    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.manager.borrow().active_connection()
    }

    pub fn recomputations(&self) -> u64 {
        self.board.borrow().recomputations()
    }

    pub fn with_transport<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(self.manager.borrow().transport())
    }
}

fn publish(board: &RefCell<MarketBoard>, on_view: &ViewCallback) {
    let view = board.borrow_mut().view();
    on_view(&view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::MarketUniverse;
    use crate::infrastructure::memory::RecordingTransport;

    struct Harness {
        feed: MarketFeed<RecordingTransport>,
        sink: Rc<RefCell<Option<EventSink>>>,
        views: Rc<RefCell<Vec<MarketView>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(
                FeedConfig::default().with_universe(MarketUniverse::from_wire(&["BTC-EUR", "ETH-EUR"])),
            )
        }

        fn with_config(config: FeedConfig) -> Self {
            let sink = Rc::new(RefCell::new(None));
            let views = Rc::new(RefCell::new(Vec::new()));
            let feed = {
                let sink = Rc::clone(&sink);
                let views = Rc::clone(&views);
                MarketFeed::new(
                    config,
                    move |events| {
                        *sink.borrow_mut() = Some(events);
                        RecordingTransport::new()
                    },
                    move |view: &MarketView| views.borrow_mut().push(view.clone()),
                )
            };
            Self { feed, sink, views }
        }

        fn emit(&self, event: TransportEvent) {
            let id = self.feed.active_connection().unwrap();
            let sink = self.sink.borrow().clone().unwrap();
            sink(id, event);
        }
    }

    #[test]
    fn sink_events_reach_the_manager() {
        let harness = Harness::new();
        harness.feed.open();
        harness.emit(TransportEvent::Opened);
        harness.emit(TransportEvent::Message(r#"{"event":"subscribed"}"#.into()));

        assert_eq!(harness.feed.state(), ConnectionState::Subscribed);
        assert_eq!(harness.feed.with_transport(|t| t.sent().len()), 1);
        let last = harness.views.borrow().last().cloned().unwrap();
        assert_eq!(last.rows.len(), 2);
        assert!(last.is_initial_loading);
    }

    #[test]
    fn mutators_publish_new_views() {
        let harness = Harness::new();
        harness.feed.open();
        harness.emit(TransportEvent::Message(r#"{"event":"subscribed"}"#.into()));

        harness.feed.set_search_term("eth");
        harness.feed.toggle_sort(SortField::Last);

        let views = harness.views.borrow();
        let last = views.last().unwrap();
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.rows[0].market, "ETH");
        assert_eq!(last.order_by.field, SortField::Last);
    }

    #[test]
    fn search_debounce_follows_the_config() {
        assert_eq!(Harness::new().feed.search_debounce(), Duration::from_millis(500));

        let config = FeedConfig::default().with_search_debounce(Duration::from_millis(50));
        let quick = Harness::with_config(config);
        assert_eq!(quick.feed.search_debounce(), Duration::from_millis(50));
    }

    #[test]
    fn dropped_feed_ignores_late_events() {
        let harness = Harness::new();
        harness.feed.open();
        let id = harness.feed.active_connection().unwrap();
        let sink = harness.sink.borrow().clone().unwrap();
        drop(harness);
        sink(id, TransportEvent::Opened);
    }
}
