//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DeviceId;
use crate::tables::TableError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "no device with id alpha is connected"
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
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                   |
/// |-----------|------------------|-------------------------------|
/// | 1000–1999 | Validation/Auth  | 400 Bad Request / 403 Forbidden |
/// | 2000–2999 | Device           | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server           | 500 / 502                     |
/// | 4000–4999 | Lookup tables    | 404 Not Found                 |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No live connection exists for the target device.
    #[error("no device with id {0} is connected")]
    DeviceNotConnected(DeviceId),

    /// A live connection already exists for the device.
    #[error("device {0} is already connected")]
    DeviceAlreadyConnected(DeviceId),

    /// The named lookup table does not exist.
    #[error("requested QRG lookup table '{0}' does not exist")]
    TableNotFound(String),

    /// The lookup table content violates its structural rules.
    #[error("QRG lookup table '{table}' is invalid: {reason}")]
    TableInvalid {
        /// Table name.
        table: String,
        /// Which rule was violated.
        reason: String,
    },

    /// Retrieving a remote lookup table failed at the transport level.
    #[error("failed to fetch QRG lookup table '{table}': {reason}")]
    FetchFailed {
        /// Table name.
        table: String,
        /// Transport failure description.
        reason: String,
    },

    /// Sending to a live connection failed.
    #[error("failed to deliver command to device {device_id}: {reason}")]
    DeliveryFailed {
        /// Target device.
        device_id: DeviceId,
        /// Why the send did not complete.
        reason: String,
    },

    /// Admin secret missing or wrong.
    #[error("unauthorized")]
    Unauthorized,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Unauthorized => 1003,
            Self::DeviceNotConnected(_) => 2001,
            Self::DeviceAlreadyConnected(_) => 2002,
            Self::Internal(_) => 3000,
            Self::DeliveryFailed { .. } => 3001,
            Self::FetchFailed { .. } => 3002,
            Self::TableNotFound(_) => 4001,
            Self::TableInvalid { .. } => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::DeviceNotConnected(_) | Self::TableNotFound(_) | Self::TableInvalid { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::DeviceAlreadyConnected(_) => StatusCode::CONFLICT,
            Self::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::DeliveryFailed { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the HTTP caller.
    ///
    /// Internal failures collapse to a generic notice.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TableError> for GatewayError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotFound(table) => Self::TableNotFound(table),
            TableError::Invalid { table, reason } => Self::TableInvalid { table, reason },
            TableError::FetchFailed { table, reason } => Self::FetchFailed { table, reason },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "internal error");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
