//! `document.visibilityState` as a stream of domain [`Visibility`] changes.

use gloo::events::EventListener;

use crate::domain::{
    errors::{FeedError, FeedResult},
    feed::Visibility,
    logging::LogComponent,
};
use crate::log_debug;

const VISIBILITY_CHANGE: &str = "visibilitychange";

/// Keeps the `visibilitychange` listener registered; dropping it unregisters.
pub struct VisibilityListener {
    _listener: EventListener,
}

fn document() -> FeedResult<web_sys::Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| FeedError::Browser("Document not available".to_string()))
}

fn to_domain(state: web_sys::VisibilityState) -> Visibility {
    match state {
        web_sys::VisibilityState::Hidden => Visibility::Hidden,
        _ => Visibility::Visible,
    }
}

/// Calls `on_change` with the new state every time the page is shown or hidden.
pub fn on_visibility_change(
    mut on_change: impl FnMut(Visibility) + 'static,
) -> FeedResult<VisibilityListener> {
    let document = document()?;
    let target = document.clone();
    let listener = EventListener::new(&target, VISIBILITY_CHANGE, move |_event| {
        let visibility = to_domain(document.visibility_state());
        log_debug!(LogComponent::Infrastructure("Visibility"), "page is now {visibility}");
        on_change(visibility);
    });
    Ok(VisibilityListener { _listener: listener })
}
