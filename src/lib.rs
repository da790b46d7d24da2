use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod domain;
pub mod global_state;
pub mod infrastructure;
pub mod macros;

/// Installs logging and mounts the board.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(
        infrastructure::services::BrowserTimeProvider::new(),
    ));

    get_logger().info(LogComponent::Presentation("Initialize"), "🚀 Ticker board initialized");

    #[cfg(feature = "csr")]
    leptos::mount_to_body(app::App);
}
