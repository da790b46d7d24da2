//! WebSocket transport and the wire DTOs of the ticker feed.

pub mod dto;
pub mod socket_client;

pub use dto::*;
pub use socket_client::GlooSocketTransport;
