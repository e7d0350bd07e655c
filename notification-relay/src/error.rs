use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationPolicy;
use crate::services::ProviderError;

pub const SENT_BODY: &str = "Message sent successfully";
pub const DELIVERY_FAILED_BODY: &str = "Failed to send message";

/// Terminal outcomes of a relay request other than success.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Valid JSON body is required.")]
    MissingBody,

    #[error("Invalid JSON body.")]
    InvalidBody,

    #[error("{}", missing_fields_message(.0))]
    MissingFields(ValidationPolicy),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] ProviderError),
}

fn missing_fields_message(policy: &ValidationPolicy) -> &'static str {
    match policy {
        ValidationPolicy::Strict => "Both fris and team fields are required.",
        ValidationPolicy::Flexible => {
            "Either a \"message\" or both \"fris\" and \"team\" fields are required."
        }
    }
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingBody | RelayError::InvalidBody | RelayError::MissingFields(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => "method_not_allowed",
            RelayError::MissingBody => "missing_body",
            RelayError::InvalidBody => "invalid_body",
            RelayError::MissingFields(_) => "missing_fields",
            RelayError::Delivery(_) => "delivery_failed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            RelayError::MethodNotAllowed => {
                (status, Json(json!({ "message": "Method Not Allowed" }))).into_response()
            }
            // Provider detail stays in the logs.
            RelayError::Delivery(_) => (status, DELIVERY_FAILED_BODY).into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_json() {
        let response = RelayError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({ "message": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_bad_request_bodies_are_plain_text() {
        let cases = [
            (RelayError::MissingBody, "Valid JSON body is required."),
            (RelayError::InvalidBody, "Invalid JSON body."),
            (
                RelayError::MissingFields(ValidationPolicy::Strict),
                "Both fris and team fields are required.",
            ),
            (
                RelayError::MissingFields(ValidationPolicy::Flexible),
                "Either a \"message\" or both \"fris\" and \"team\" fields are required.",
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_text(response).await, expected);
        }
    }

    #[tokio::test]
    async fn test_delivery_failure_hides_provider_detail() {
        let error = RelayError::from(ProviderError::Rejected {
            status: 400,
            body: "secret detail".to_string(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, DELIVERY_FAILED_BODY);
    }
}
