use std::cell::RefCell;
use std::sync::Arc;

use leptos::*;
use strum::IntoEnumIterator;

use crate::{
    application::{Debouncer, FeedConfig, MarketFeed, MarketView},
    domain::{
        errors::FeedResult,
        logging::LogComponent,
        projection::{DisplayRow, OrderBy, SortDirection, SortField, format::format_price},
    },
    global_signals,
    infrastructure::{
        timers::TimeoutDebouncer,
        visibility::{VisibilityListener, on_visibility_change},
        websocket::GlooSocketTransport,
    },
    log_error, log_info,
};

global_signals! {
    rows => rows: Arc<[DisplayRow]>,
    is_initial_loading => is_initial_loading: bool,
    order_by => order_by: OrderBy,
    search_input => search_input: String,
}

thread_local! {
    static FEED: RefCell<Option<MarketFeed<GlooSocketTransport>>> = const { RefCell::new(None) };
    static VISIBILITY: RefCell<Option<VisibilityListener>> = const { RefCell::new(None) };
}

/// Copies a view into the global signals the components render from.
pub fn publish_view(view: &MarketView) {
    rows().set(Arc::clone(&view.rows));
    is_initial_loading().set(view.is_initial_loading);
    order_by().set(view.order_by);
}

fn with_feed<R>(f: impl FnOnce(&MarketFeed<GlooSocketTransport>) -> R) -> Option<R> {
    let feed = FEED.with(|cell| cell.borrow().clone());
    feed.map(|feed| f(&feed))
}

/// Opens the feed and ties it to page visibility.
pub fn start_feed(config: FeedConfig) -> FeedResult<()> {
    stop_feed();

    let feed = MarketFeed::new(config, GlooSocketTransport::new, publish_view);
    let listener = {
        let feed = feed.clone();
        on_visibility_change(move |visibility| feed.set_visibility(visibility))?
    };

    publish_view(&feed.view());
    feed.open();
    FEED.with(|cell| cell.borrow_mut().replace(feed));
    VISIBILITY.with(|cell| cell.borrow_mut().replace(listener));
    log_info!(LogComponent::Presentation("App"), "🚀 Market feed started");
    Ok(())
}

pub fn stop_feed() {
    VISIBILITY.with(|cell| cell.borrow_mut().take());
    if let Some(feed) = FEED.with(|cell| cell.borrow_mut().take()) {
        feed.close();
    }
}

/// Arrow shown next to a column heading.
pub fn sort_indicator(order_by: OrderBy, field: SortField) -> &'static str {
    if order_by.field != field {
        return "↕";
    }
    match order_by.direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

pub fn icon_href(market: &str) -> String {
    format!("/market-icons.svg#{}", market.to_lowercase())
}

pub fn price_label(last: &str) -> String {
    format!("€{}", format_price(last))
}

pub fn change_label(change: &str) -> String {
    format!("{change}%")
}

pub fn change_class(change: &str) -> &'static str {
    if change.trim_start_matches(['+', '-']).trim_matches(|c| c == '0' || c == '.').is_empty() {
        "change"
    } else if change.starts_with('-') {
        "change negative"
    } else {
        "change positive"
    }
}

/// 🦀 Root component: starts the feed and renders the market list.
#[component]
pub fn App() -> impl IntoView {
    if let Err(e) = start_feed(FeedConfig::default()) {
        log_error!(LogComponent::Presentation("App"), "❌ Could not start market feed: {e}");
    }
    on_cleanup(stop_feed);

    view! {
        <style>
            {r#"
            .ticker-board-app {
                font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
                background: #1e2633;
                min-height: 100vh;
                padding: 20px;
                color: white;
            }

            .market-list {
                max-width: 960px;
                margin: 0 auto;
            }

            .search {
                width: 100%;
                padding: 10px 12px;
                margin-bottom: 15px;
                border-radius: 8px;
                border: 1px solid #4a5d73;
                background: #2c3e50;
                color: white;
            }

            .markets-table {
                width: 100%;
                border-collapse: collapse;
            }

            .markets-table th {
                cursor: pointer;
                text-align: left;
                padding: 8px;
                color: #a0a0a0;
                user-select: none;
            }

            .markets-table td {
                padding: 8px;
                border-top: 1px solid rgba(255, 255, 255, 0.08);
            }

            .market-icon {
                width: 20px;
                height: 20px;
                margin-right: 8px;
                vertical-align: middle;
            }

            .change.positive { color: #72c685; }
            .change.negative { color: #e74c3c; }

            .loading {
                text-align: center;
                color: #a0a0a0;
            }
            "#}
        </style>
        <div class="ticker-board-app">
            <MarketList />
        </div>
    }
}

/// 🔍 Heading, search box and the table.
#[component]
fn MarketList() -> impl IntoView {
    let search_input = search_input();
    let is_initial_loading = is_initial_loading();
    let rows = rows();

    let quiet = with_feed(|feed| feed.search_debounce())
        .unwrap_or_else(|| FeedConfig::default().search_debounce);
    let debouncer = TimeoutDebouncer::new(Debouncer::new(quiet), |term: String| {
        with_feed(|feed| feed.set_search_term(&term));
    });
    on_cleanup({
        let debouncer = debouncer.clone();
        move || debouncer.cancel()
    });

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        search_input.set(value.clone());
        debouncer.push(value);
    };

    view! {
        <section class="market-list">
            <h2>"Market list"</h2>
            <input
                type="text"
                class="search"
                placeholder="Search"
                prop:value=move || search_input.get()
                on:input=on_input
            />
            <table class="markets-table">
                <MarketsTableHeader />
                <tbody>
                    {move || {
                        if is_initial_loading.get() {
                            view! { <LoadingRow /> }.into_view()
                        } else {
                            view! {
                                <For
                                    each=move || rows.get().to_vec()
                                    key=|row| row.clone()
                                    children=move |row| view! { <MarketsTableRow row=row /> }
                                />
                            }
                            .into_view()
                        }
                    }}
                </tbody>
            </table>
        </section>
    }
}

/// ↕️ Four sortable column headings.
#[component]
fn MarketsTableHeader() -> impl IntoView {
    let order_by = order_by();

    view! {
        <thead>
            <tr>
                {SortField::iter()
                    .map(|field| {
                        view! {
                            <th on:click=move |_| {
                                with_feed(|feed| feed.toggle_sort(field));
                            }>
                                {field.label()}
                                " "
                                <span class="sort-indicator">
                                    {move || sort_indicator(order_by.get(), field)}
                                </span>
                            </th>
                        }
                    })
                    .collect_view()}
            </tr>
        </thead>
    }
}

#[component]
fn MarketsTableRow(row: DisplayRow) -> impl IntoView {
    let icon = format!(r#"<use href="{}"></use>"#, icon_href(&row.market));
    let change_class = change_class(&row.change24h);

    view! {
        <tr class="market-row">
            <td>
                <svg class="market-icon" inner_html=icon></svg>
                <span>{row.market.clone()}</span>
            </td>
            <td>{price_label(&row.last)}</td>
            <td>{row.volume_quote.clone()}</td>
            <td class=change_class>{change_label(&row.change24h)}</td>
        </tr>
    }
}

#[component]
fn LoadingRow() -> impl IntoView {
    view! {
        <tr>
            <td class="loading" colspan="4">"Loading..."</td>
        </tr>
    }
}
