pub mod pushover;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::Notification;

pub use pushover::{MockPushProvider, PushoverProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Connection(_) => "connection",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Rejected { .. } => "rejected",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::Configuration(_) => "configuration",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Provider-assigned request id, when the payload carries one.
    pub request_id: Option<String>,
    /// Raw downstream payload, kept for diagnostics only.
    pub payload: Value,
}

impl ProviderResponse {
    pub fn success(payload: Value) -> Self {
        let request_id = payload
            .get("request")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            request_id,
            payload,
        }
    }
}

/// Delivers one notification. Exactly one attempt is made per call.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<ProviderResponse, ProviderError>;
    fn name(&self) -> &'static str;
}
