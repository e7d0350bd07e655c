//! Fixed-origin CORS handling.
//!
//! Every response gets the same three headers, and any `OPTIONS` request is
//! answered with an empty 200 before it reaches routing or method checks.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allowed_origin: &str) -> Result<Self, header::InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(allowed_origin)?,
        })
    }

    pub fn allowed_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }
}

pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        tracing::debug!(uri = %req.uri(), "Answering CORS preflight");
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    policy.apply(response.headers_mut());
    response
}
