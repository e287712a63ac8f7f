//! Error types for the trip-planner API client.
//!
//! # Design
//! Every failure the gateway can produce lands in one `ApiError`. The
//! `Display` output is the human-readable message surfaced to callers. The
//! two non-JSON variants also keep the first characters of the body so the
//! redirect page or proxy error that caused them can be inspected.

use thiserror::Error;

/// Errors returned by `RequestGateway` and the `TripApi` operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No response was received from the backend.
    #[error("{message}")]
    NetworkUnreachable { message: String },

    /// A 2xx response whose body is not JSON.
    #[error("Server returned non-JSON response. Check server configuration.")]
    UnexpectedNonJsonResponse { status: u16, preview: String },

    /// A non-2xx response whose body is not JSON.
    #[error("Server returned non-JSON response ({status}): {reason}")]
    NonJsonErrorResponse {
        status: u16,
        reason: String,
        preview: String,
    },

    /// The response declared JSON but the body did not decode.
    #[error("malformed JSON response: {0}")]
    MalformedJson(String),

    /// A non-2xx JSON response.
    #[error("{message}")]
    HttpError { status: u16, message: String },

    /// The request could not be built and was never sent.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status attached to the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedNonJsonResponse { status, .. }
            | ApiError::NonJsonErrorResponse { status, .. }
            | ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
