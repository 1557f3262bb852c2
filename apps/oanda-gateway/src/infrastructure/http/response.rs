//! Response envelopes and error mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::GatewayError;

/// `error` field of the fallback envelope.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// `GET /` body.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Greeting.
    pub message: &'static str,
    /// `practice` or `live`.
    pub environment: String,
    /// Always `healthy`.
    pub status: &'static str,
    /// Server time, RFC 3339.
    pub timestamp: String,
}

/// `GET /health` body. Returned with 200 whether or not the broker answered.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: &'static str,
    /// Probe failure text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `ok` or `failed`.
    pub oanda_connection: &'static str,
    /// Configured account, healthy only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Configured environment, healthy only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl HealthResponse {
    /// Broker answered the probe.
    #[must_use]
    pub fn healthy(account_id: &str, environment: &str) -> Self {
        Self {
            status: "healthy",
            error: None,
            oanda_connection: "ok",
            account_id: Some(account_id.to_string()),
            environment: Some(environment.to_string()),
        }
    }

    /// Broker probe failed.
    #[must_use]
    pub const fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            error: Some(error),
            oanda_connection: "failed",
            account_id: None,
            environment: None,
        }
    }
}

/// `{success: true, data}` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    /// Always true.
    pub success: bool,
    /// Payload.
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, data: [...], count}` envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Always true.
    pub success: bool,
    /// Items as returned by the broker.
    pub data: Vec<Value>,
    /// `data.len()`.
    pub count: usize,
}

impl ListResponse {
    /// Wrap a list.
    #[must_use]
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Payload of `GET /historical/{instrument}`.
#[derive(Debug, Serialize)]
pub struct CandlesData {
    /// Requested instrument.
    pub instrument: String,
    /// Granularity actually requested.
    pub granularity: String,
    /// Candles as returned by the broker.
    pub candles: Vec<Value>,
    /// Number of candles returned.
    pub count: usize,
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Set on the fallback envelope only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    /// Human-readable reason.
    pub detail: String,
}

impl ErrorResponse {
    /// Endpoint error envelope.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: None,
            detail: detail.into(),
        }
    }

    /// Fallback envelope for unhandled failures.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(INTERNAL_SERVER_ERROR),
            detail: detail.into(),
        }
    }
}

/// Handler error, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse::new(detail),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorResponse::new(detail),
        }
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        let status = match &error {
            GatewayError::InvalidRequest(_) | GatewayError::Upstream(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            body: ErrorResponse::new(error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected query string");
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected path parameter");
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
