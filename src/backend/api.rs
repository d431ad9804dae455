//! Wire types and the client trait for the external backend.
//!
//! Every response arrives in a `{data, message}` envelope. Error responses
//! carry a structured body under `data` with `status`, `code`, and
//! `errorMessage` fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::signup::payload::SignupPayload;

/// The `{data, message}` envelope wrapping every backend response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Structured error body returned under `data` on failures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: Option<String>,
    pub code: Option<String>,
    pub error_message: Option<String>,
}

impl ErrorBody {
    /// Whether this body reports a duplicate-resource conflict.
    pub fn is_conflict(&self) -> bool {
        self.status.as_deref() == Some("CONFLICT")
    }
}

/// Success payload of `POST /join/sms-verification`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCodeData {
    /// The dispatched 6-digit verification code.
    pub auth_code: String,
}

/// Request body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id_or_phone: String,
    pub password: String,
    pub device_token: String,
}

/// Success payload of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub member_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub role: String,
}

/// Outcome of a successful worker-join call.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Server message, if any ("회원가입이 완료되었습니다." fallback applied
    /// by the caller).
    pub message: Option<String>,
}

/// The external backend the signup and login flows delegate to.
///
/// Implemented over HTTP by [`HttpJoinBackend`](super::HttpJoinBackend);
/// tests substitute stubs.
#[async_trait]
pub trait JoinBackend: Send + Sync {
    /// `POST /join/validation-phone` — duplicate check for a digits-only
    /// phone number. `Ok(())` means the number is available; a registered
    /// number surfaces as [`BackendError::Conflict`] carrying the server's
    /// message verbatim.
    async fn check_phone_duplicate(&self, phone: &str) -> Result<(), BackendError>;

    /// `POST /join/sms-verification` — dispatch an SMS code to a digits-only
    /// phone number and return the issued 6-digit code.
    async fn send_sms_code(&self, phone: &str) -> Result<String, BackendError>;

    /// `POST /join/worker/join` — submit the signup payload as multipart
    /// (one `request` JSON part plus placeholder file parts).
    async fn worker_join(&self, payload: &SignupPayload) -> Result<JoinOutcome, BackendError>;

    /// `POST /login`.
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, BackendError>;
}
