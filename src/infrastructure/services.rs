//! Infrastructure implementations of the domain logging abstractions.

use std::sync::{Arc, Mutex};

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Logger writing to the browser console, one console method per level.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Warn)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = wasm_bindgen::JsValue::from(entry.render());
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }
}

/// Wall clock backed by `Date.now()`.
#[derive(Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp as f64));
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Logger that keeps entries in memory; clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries().iter().any(|entry| entry.level == level && entry.message.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
