//! # Observability
//!
//! Structured logging for the failover agent.
//!
//! Every security-relevant decision (challenge issuance, decode failures,
//! transition refusals) is logged with full detail here, while the HTTP
//! surface returns deliberately low-information responses.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its default severity, with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
