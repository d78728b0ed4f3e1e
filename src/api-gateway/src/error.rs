//! Error handling for the API Gateway
//!
//! Every failure is rendered as the `{success: false, message, error?}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Main error type for the API Gateway
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    MissingParameter { message: String },

    #[error("Could not determine directory from payload")]
    UnresolvedDirectory,

    #[error("{message}")]
    Configuration { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{service} API error: {status}")]
    Upstream { service: String, status: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error processing {operation}")]
    Processing { operation: String, detail: Value },

    #[error("Failed to trigger build for {project}")]
    BuildTrigger { project: String, detail: Value },
}

/// Failure envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ApiError {
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::MissingParameter {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Non-success HTTP status from an upstream service
    pub fn upstream(service: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            status: status.into(),
        }
    }

    pub fn build_trigger(project: impl Into<String>, detail: Value) -> Self {
        Self::BuildTrigger {
            project: project.into(),
            detail,
        }
    }

    /// Wrap an upstream, transport or decoding failure at a handler boundary.
    ///
    /// Client, configuration and not-found errors are returned unchanged.
    pub fn during(self, operation: &str) -> Self {
        match self {
            ApiError::Upstream { .. } | ApiError::HttpClient(_) | ApiError::Json(_) => {
                ApiError::Processing {
                    operation: operation.to_string(),
                    detail: Value::String(self.to_string()),
                }
            }
            other => other,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter { .. } | ApiError::UnresolvedDirectory => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Configuration { .. }
            | ApiError::Upstream { .. }
            | ApiError::HttpClient(_)
            | ApiError::Json(_)
            | ApiError::Processing { .. }
            | ApiError::BuildTrigger { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Raw upstream detail carried in the envelope's `error` field
    pub fn detail(&self) -> Option<Value> {
        match self {
            ApiError::Processing { detail, .. } | ApiError::BuildTrigger { detail, .. } => {
                Some(detail.clone())
            }
            _ => None,
        }
    }

    /// Check if this error should be logged
    pub fn should_log(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if self.should_log() {
            error!(
                error = %self,
                detail = ?self.detail(),
                status_code = %status_code,
                "API error occurred"
            );
        }

        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
            error: self.detail(),
        };

        (status_code, Json(body)).into_response()
    }
}

/// Convert a handler panic into a 500 failure envelope
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!(detail = %detail, "Handler panicked");

    let body = ErrorResponse {
        success: false,
        message: "Internal server error".to_string(),
        error: Some(Value::String(detail)),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::missing_parameter("Directory ID is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnresolvedDirectory.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Directory not found: acme").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::configuration("missing").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::upstream("NocoDB", "502 Bad Gateway").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_during_wraps_upstream_failures() {
        let err = ApiError::upstream("NocoDB", "503 Service Unavailable").during("directory request");
        assert_eq!(err.to_string(), "Error processing directory request");
        assert_eq!(
            err.detail(),
            Some(json!("NocoDB API error: 503 Service Unavailable"))
        );
    }

    #[test]
    fn test_during_keeps_client_errors() {
        let err = ApiError::not_found("Directory not found: acme").during("directory request");
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.to_string(), "Directory not found: acme");

        let err = ApiError::configuration("NocoDB API configuration is missing")
            .during("listings request");
        assert!(matches!(err, ApiError::Configuration { .. }));
    }

    #[test]
    fn test_should_log() {
        assert!(!ApiError::missing_parameter("x").should_log());
        assert!(!ApiError::not_found("x").should_log());
        assert!(ApiError::configuration("x").should_log());
        assert!(ApiError::build_trigger("p", json!([])).should_log());
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response =
            ApiError::build_trigger("ncstudio-directory-acme", json!([{"code": 8000007}]))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Failed to trigger build for ncstudio-directory-acme",
                "error": [{"code": 8000007}]
            })
        );
    }

    #[test]
    fn test_panic_response() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_envelope_omits_error_for_client_failures() {
        let response = ApiError::missing_parameter("Directory ID is required").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Directory ID is required"})
        );
    }
}
