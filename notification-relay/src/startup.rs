//! Application startup and lifecycle management.
//!
//! One HTTP server carries the relay route plus health and metrics endpoints.

use crate::config::{RelayConfig, RelaySettings};
use crate::handlers::{health_check, method_not_allowed, metrics_endpoint, send_text};
use crate::models::ValidationPolicy;
use crate::services::{PushProvider, PushoverProvider};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_middleware, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub policy: ValidationPolicy,
    pub provider: Arc<dyn PushProvider>,
}

/// Build the HTTP router for the relay.
pub fn build_router(state: AppState, settings: &RelaySettings) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route(
            &settings.path,
            post(send_text).fallback(method_not_allowed),
        )
        .route_layer(from_fn(metrics_middleware))
        .with_state(state);

    // Preflights short-circuit here, inside the trace and request id layers.
    let router = match &settings.cors {
        Some(policy) => router.layer(from_fn_with_state(policy.clone(), cors_middleware)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Pushover provider from `config`.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = PushoverProvider::new(config.pushover.clone()).map_err(|e| {
            tracing::error!("Failed to initialize Pushover provider: {}", e);
            AppError::from(anyhow::Error::new(e))
        })?;
        tracing::info!(api_url = %config.pushover.api_url, "Pushover provider initialized");

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: RelayConfig,
        provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            policy: config.relay.validation_policy,
            provider,
        };
        let router = build_router(state, &config.relay);

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            path = %config.relay.path,
            policy = %config.relay.validation_policy,
            cors = config.relay.cors.is_some(),
            "Notification relay listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockPushProvider;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use service_core::middleware::CorsPolicy;
    use tower::ServiceExt;

    fn router(path: &str, provider: Arc<MockPushProvider>) -> Router {
        router_with_cors(path, provider, None)
    }

    fn router_with_cors(
        path: &str,
        provider: Arc<MockPushProvider>,
        cors: Option<CorsPolicy>,
    ) -> Router {
        let settings = RelaySettings {
            path: path.to_string(),
            validation_policy: ValidationPolicy::Flexible,
            cors,
        };
        let state = AppState {
            policy: settings.validation_policy,
            provider,
        };
        build_router(state, &settings)
    }

    fn post_request(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_relay_is_served_on_configured_path() {
        let provider = Arc::new(MockPushProvider::new(true));
        let app = router("/api/send-text", provider.clone());

        let response = app
            .clone()
            .oneshot(post_request("/api/send-text", r#"{"message":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_request("/send-text", r#"{"message":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(provider.send_count(), 1);
    }

    #[tokio::test]
    async fn test_head_is_method_not_allowed() {
        let provider = Arc::new(MockPushProvider::new(true));
        let response = router("/send-text", provider)
            .oneshot(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/send-text")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_with_request_id() {
        let provider = Arc::new(MockPushProvider::new(true));
        let cors = CorsPolicy::new("https://example.org").unwrap();
        let response = router_with_cors("/send-text", provider.clone(), Some(cors))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/send-text")
                    .header(REQUEST_ID_HEADER, "preflight-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "preflight-1"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "https://example.org"
        );
        assert_eq!(provider.send_count(), 0);
    }
}
