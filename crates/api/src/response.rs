//! Response envelope and error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::Error;
use serde::{Deserialize, Serialize};
use telemetry::{HealthReport, MetricsSnapshot};

/// `{success, data?, message?}` envelope returned by every action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stable error code for failed outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Fault detail, only on 500 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            code: None,
            error: None,
        }
    }

    /// Serializes `data` into a success envelope.
    pub fn data<T: Serialize>(data: &T) -> Result<Self, Error> {
        Ok(Self::ok(serde_json::to_value(data)?))
    }

    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            code: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Business-level failure; still answered with 200.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            code: None,
            error: None,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error leaving a handler.
///
/// Expected outcomes (bad parameters, missing records, store failures)
/// become a 200 envelope with `success: false`. Only internal faults are
/// answered with 500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl ApiError {
    pub fn server_error(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            envelope: Envelope {
                error: Some(detail.into()),
                ..Envelope::fail("Server error")
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_internal() {
            return ApiError::server_error(err.to_string());
        }
        Self {
            status: StatusCode::OK,
            envelope: Envelope {
                code: Some(err.code().code().to_string()),
                ..Envelope::fail(err.to_string())
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub report: HealthReport,
    pub store: String,
    pub metrics: MetricsSnapshot,
}
