//! HTTP handlers for notification-relay.

pub mod health;
pub mod send_text;

pub use health::{health_check, metrics_endpoint};
pub use send_text::{method_not_allowed, send_text};
