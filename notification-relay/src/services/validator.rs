//! Request body parsing and field validation.
//!
//! Both steps are pure: they look only at the bytes and the active policy.

use serde_json::{Map, Value};

use crate::error::RelayError;
use crate::models::{IncomingEvent, ValidatedEvent, ValidationPolicy};

/// Parse a raw request body into a JSON object.
///
/// A body that is a JSON string holding JSON (a payload serialized twice by
/// the caller) is decoded a second time.
pub fn parse_body(raw: &[u8]) -> Result<Map<String, Value>, RelayError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::MissingBody);
    }

    let value: Value = serde_json::from_slice(raw).map_err(|_| RelayError::InvalidBody)?;
    let value = match value {
        Value::String(text) => serde_json::from_str(&text).map_err(|_| RelayError::InvalidBody)?,
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RelayError::MissingBody),
    }
}

pub fn parse_event(raw: &[u8]) -> Result<IncomingEvent, RelayError> {
    let map = parse_body(raw)?;
    // Field deserializers are lenient, so an object always converts.
    serde_json::from_value(Value::Object(map)).map_err(|_| RelayError::InvalidBody)
}

/// Apply the field rules of `policy`. Under the flexible policy a `message`
/// wins over `fris`/`team` when both forms are present.
pub fn validate(
    event: IncomingEvent,
    policy: ValidationPolicy,
) -> Result<ValidatedEvent, RelayError> {
    let IncomingEvent {
        message,
        fris,
        team,
    } = event;

    match (policy, message, fris, team) {
        (ValidationPolicy::Flexible, Some(message), _, _) => Ok(ValidatedEvent::Custom { message }),
        (_, _, Some(fris), Some(team)) => Ok(ValidatedEvent::FrisbeeCollected { fris, team }),
        _ => Err(RelayError::MissingFields(policy)),
    }
}
