//! Error types for the signup service.
//!
//! User-facing messages are carried inside the variants so each failing
//! action surfaces exactly one notification string.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from calls to the external join/login backend.
///
/// Every variant's display string is the notification shown to the user.
/// `Conflict` carries the server's own message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The resource already exists (duplicate phone or account).
    #[error("{message}")]
    Conflict {
        code: Option<String>,
        message: String,
    },

    /// HTTP 400 — the request was malformed.
    #[error("{message}")]
    BadInput { message: String },

    /// HTTP 429 — the user should retry later.
    #[error("{message}")]
    RateLimited { message: String },

    /// HTTP 5xx — the backend itself failed.
    #[error("{message}")]
    ServerInternal { message: String },

    /// Any other non-success status.
    #[error("{message}")]
    Unexpected { status: u16, message: String },

    /// The request could not be sent or the response never arrived.
    #[error("네트워크 연결을 확인해주세요.")]
    Connectivity,

    /// The response body could not be parsed as the expected shape.
    #[error("서버 응답을 처리할 수 없습니다.")]
    MalformedResponse,
}

/// Errors produced by user-driven flows (wizard, verification, login).
#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    /// Local field-level validation failure. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl FlowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let status = match &self {
            FlowError::Validation(_) => StatusCode::BAD_REQUEST,
            FlowError::Backend(backend) => match backend {
                BackendError::Conflict { .. } => StatusCode::CONFLICT,
                BackendError::BadInput { .. } => StatusCode::BAD_REQUEST,
                BackendError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                BackendError::ServerInternal { .. }
                | BackendError::Unexpected { .. }
                | BackendError::Connectivity
                | BackendError::MalformedResponse => StatusCode::BAD_GATEWAY,
            },
        };
        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
