#![allow(dead_code)]

use notification_relay::config::{RelayConfig, RelaySettings};
use notification_relay::models::ValidationPolicy;
use notification_relay::services::{MockPushProvider, PushProvider};
use notification_relay::startup::Application;
use service_core::config::Config as CoreConfig;
use service_core::middleware::CorsPolicy;
use std::sync::Arc;

pub const TEST_ORIGIN: &str = "https://frisbee.example.com";
pub const RELAY_PATH: &str = "/send-text";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockPushProvider>,
    pub client: reqwest::Client,
}

pub fn relay_settings(policy: ValidationPolicy, cors: bool) -> RelaySettings {
    RelaySettings {
        path: RELAY_PATH.to_string(),
        validation_policy: policy,
        cors: cors.then(|| CorsPolicy::new(TEST_ORIGIN).expect("valid test origin")),
    }
}

impl TestApp {
    /// Flexible policy, CORS enabled, provider that always succeeds.
    pub async fn spawn() -> Self {
        Self::spawn_with(relay_settings(ValidationPolicy::Flexible, true), true).await
    }

    pub async fn spawn_with(relay: RelaySettings, provider_succeeds: bool) -> Self {
        let provider = Arc::new(MockPushProvider::new(provider_succeeds));
        let (address, port) = spawn_app(relay, provider.clone()).await;

        TestApp {
            address,
            port,
            provider,
            client: reqwest::Client::new(),
        }
    }

    pub fn relay_url(&self) -> String {
        format!("{}{}", self.address, RELAY_PATH)
    }

    pub async fn post_json(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.relay_url())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, body: &str, content_type: &str) -> reqwest::Response {
        self.client
            .post(self.relay_url())
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn request(&self, method: reqwest::Method) -> reqwest::Response {
        self.client
            .request(method, self.relay_url())
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Start the application on a random port around `provider` and wait for it.
pub async fn spawn_app(relay: RelaySettings, provider: Arc<dyn PushProvider>) -> (String, u16) {
    let config = RelayConfig {
        common: CoreConfig { port: 0 },
        relay,
        ..Default::default()
    };

    let app = Application::build_with_provider(config, provider)
        .await
        .expect("Failed to build test application");

    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    // Wait for the server to be ready by polling the health endpoint
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    (address, port)
}
