use super::{ProviderError, ProviderResponse, PushProvider};
use crate::config::PushoverConfig;
use crate::models::{Notification, OutboundNotification};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

pub struct PushoverProvider {
    config: PushoverConfig,
    client: Client,
}

impl PushoverProvider {
    pub fn new(config: PushoverConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Connection(format!("Failed to reach Pushover: {}", e))
    }
}

#[async_trait]
impl PushProvider for PushoverProvider {
    async fn send(&self, notification: &Notification) -> Result<ProviderResponse, ProviderError> {
        let form = OutboundNotification {
            token: self.config.token.expose_secret(),
            user: self.config.user_key.expose_secret(),
            message: &notification.message,
            title: &notification.title,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::InvalidResponse(format!("Failed to read Pushover response: {}", e))
            }
        })?;

        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Pushover answers with JSON; anything else is still kept verbatim for the logs.
        let payload = serde_json::from_str(&body).unwrap_or(Value::String(body));

        Ok(ProviderResponse::success(payload))
    }

    fn name(&self) -> &'static str {
        "pushover"
    }
}

/// In-memory provider that records what it was asked to send.
pub struct MockPushProvider {
    succeed: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<Notification>>,
}

impl MockPushProvider {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, notification: &Notification) -> Result<ProviderResponse, ProviderError> {
        let count = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }

        tracing::info!(
            title = %notification.title,
            "[MOCK] Push notification would be sent"
        );

        if !self.succeed {
            return Err(ProviderError::Rejected {
                status: 400,
                body: r#"{"status":0,"errors":["mock failure"]}"#.to_string(),
            });
        }

        Ok(ProviderResponse::success(serde_json::json!({
            "status": 1,
            "request": format!("mock-push-{}", count),
        })))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
