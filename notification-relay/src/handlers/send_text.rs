use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::error::{RelayError, SENT_BODY};
use crate::services::{
    format_notification, parse_event, record_delivery, record_rejection, validate,
};
use crate::startup::AppState;

/// Relay one event to the push provider.
///
/// The body is taken as raw bytes so that callers sending JSON as
/// `text/plain`, or a JSON document wrapped in a JSON string, are accepted.
#[tracing::instrument(skip(state, body), fields(policy = %state.policy))]
pub async fn send_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), RelayError> {
    let event = parse_event(&body)
        .and_then(|event| validate(event, state.policy))
        .map_err(|e| {
            tracing::warn!(reason = e.reason(), "Rejected relay request: {}", e);
            record_rejection(e.reason());
            e
        })?;

    let notification = format_notification(&event);
    let provider = state.provider.name();

    match state.provider.send(&notification).await {
        Ok(response) => {
            record_delivery(provider, "sent");
            tracing::info!(
                provider,
                event = event.kind(),
                request_id = ?response.request_id,
                response = %response.payload,
                "Push provider accepted message"
            );
            Ok((StatusCode::OK, SENT_BODY))
        }
        Err(e) => {
            record_delivery(provider, "failed");
            tracing::error!(
                provider,
                event = event.kind(),
                failure = e.kind(),
                error = %e,
                "Error sending message"
            );
            Err(RelayError::Delivery(e))
        }
    }
}

/// Any method other than POST (and OPTIONS, when CORS answers it first).
pub async fn method_not_allowed() -> RelayError {
    record_rejection(RelayError::MethodNotAllowed.reason());
    RelayError::MethodNotAllowed
}
