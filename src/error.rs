/// Unified error types for the resolve gateway
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for address resolution
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The caller did not supply an identifier
    #[error("Address parameter is required")]
    MissingIdentifier,

    /// Transport-level failure talking to an upstream service
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// Upstream body could not be decoded
    #[error("{service} returned an unreadable body: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    /// Upstream body decoded but lacks the expected field
    #[error("{service} response is missing `{field}`")]
    MissingField {
        service: &'static str,
        field: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolverError {
    /// Whether this error is the caller's fault rather than a resolution fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResolverError::MissingIdentifier)
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::MissingIdentifier => "missing_identifier",
            ResolverError::Upstream { .. } => "upstream",
            ResolverError::Decode { .. } => "decode",
            ResolverError::MissingField { .. } => "missing_field",
            ResolverError::Config(_) => "config",
            ResolverError::Internal(_) => "internal",
            ResolverError::Io(_) => "io",
        }
    }
}

/// Body returned for validation failures
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub error: String,
}

/// Body returned when resolution fails
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub error: String,
    pub details: String,
    pub resolve_time: f64,
}

pub const RESOLVE_FAILED_MESSAGE: &str = "Failed to resolve address";
pub const UNKNOWN_ERROR_DETAILS: &str = "Unknown error";

/// A failed resolution, stamped with the time spent before it failed
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ResolutionError {
    #[source]
    pub error: ResolverError,
    pub elapsed_ms: f64,
}

impl ResolutionError {
    pub fn new(error: ResolverError, elapsed_ms: f64) -> Self {
        Self { error, elapsed_ms }
    }

    /// Human-readable fault description
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Fault description for the response body, or a placeholder when the
    /// underlying error carries nothing useful
    pub fn details(&self) -> String {
        match &self.error {
            ResolverError::Internal(m) if m.trim().is_empty() => UNKNOWN_ERROR_DETAILS.to_string(),
            other => other.to_string(),
        }
    }
}

/// Convert ResolutionError to HTTP response
impl IntoResponse for ResolutionError {
    fn into_response(self) -> Response {
        if self.error.is_client_error() {
            let body = Json(ValidationErrorResponse {
                error: self.message(),
            });
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let details = self.details();
        let body = Json(FailureResponse {
            error: RESOLVE_FAILED_MESSAGE.to_string(),
            details,
            resolve_time: self.elapsed_ms,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Result type alias for resolver operations
pub type ResolverResult<T> = Result<T, ResolverError>;
