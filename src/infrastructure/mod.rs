//! Browser-facing adapters: the gloo WebSocket transport, console logging,
//! the page visibility listener and the search debounce timer.

pub mod memory;
pub mod services;
pub mod timers;
pub mod visibility;
pub mod websocket;
