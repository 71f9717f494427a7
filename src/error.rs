//! Playground error types with HTTP status code mapping.
//!
//! [`PlaygroundError`] is the central error type for the gateway. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "auto-server unreachable on port 1412",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                |
/// |-----------|--------------------|----------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request            |
/// | 2000–2999 | Auto-server state  | 502 / 503                  |
/// | 3000–3999 | Server             | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum PlaygroundError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The auto-server is not accepting connections.
    #[error("auto-server unreachable: {0}")]
    AutoServerUnreachable(String),

    /// Transport-level failure talking to the auto-server.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The auto-server accepted the request but reported a failure.
    #[error("auto-server rejected action: {0}")]
    ActionRejected(String),

    /// Mirror activation failed and the caller asked for it explicitly.
    #[error("mirror activation failed: {0}")]
    ActivationFailed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::AutoServerUnreachable(_) => 2001,
            Self::Upstream(_) => 2002,
            Self::ActionRejected(_) => 2003,
            Self::ActivationFailed(_) => 2004,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AutoServerUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) | Self::ActionRejected(_) | Self::ActivationFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for PlaygroundError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::AutoServerUnreachable(err.to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for PlaygroundError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_maps_to_service_unavailable() {
        let err = PlaygroundError::AutoServerUnreachable("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        let err = PlaygroundError::Upstream("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = PlaygroundError::ActivationFailed("window not found".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_message_includes_cause() {
        let err = PlaygroundError::AutoServerUnreachable("connection refused".to_string());
        assert_eq!(err.to_string(), "auto-server unreachable: connection refused");
    }
}
