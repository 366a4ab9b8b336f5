//! Observability subsystem for gameshelf
//!
//! Structured JSON logging plus the typed events the catalog emits. Index
//! resets, stale entries and rebuilds are recovered silently from the
//! caller's point of view; this is where they become visible.
//!
//! # Usage
//!
//! ```ignore
//! use gameshelf::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::IndexRebuilt, &[("records", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::emit(event, fields);
}
