//! HTTP implementation of [`JoinBackend`] over reqwest.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::Form;

use crate::error::BackendError;
use crate::signup::payload::SignupPayload;

use super::api::{
    ApiEnvelope, AuthCodeData, ErrorBody, JoinBackend, JoinOutcome, LoginData, LoginRequest,
};

const PHONE_VALIDATION_ENDPOINT: &str = "/join/validation-phone";
const SMS_VERIFICATION_ENDPOINT: &str = "/join/sms-verification";
const WORKER_JOIN_ENDPOINT: &str = "/join/worker/join";
const LOGIN_ENDPOINT: &str = "/login";

const MSG_RATE_LIMITED: &str = "너무 많은 요청이 발생했습니다. 잠시 후 다시 시도해주세요.";
const MSG_SERVER_INTERNAL: &str = "서버 내부 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
const MSG_BAD_PHONE: &str = "잘못된 전화번호 형식입니다.";
const MSG_DUPLICATE_PHONE: &str = "이미 등록된 핸드폰 번호입니다.";
const MSG_DUPLICATE_ACCOUNT: &str = "이미 등록된 정보입니다.";
const MSG_PHONE_CHECK_FAILED: &str = "서버 오류가 발생했습니다.";
const MSG_SMS_FAILED: &str = "인증번호 발송에 실패했습니다.";
const MSG_JOIN_BAD_INPUT: &str = "입력한 정보를 확인해주세요.";
const MSG_JOIN_FAILED: &str = "회원가입에 실패했습니다.";
const MSG_LOGIN_FAILED: &str = "로그인에 실패했습니다.";

/// Talks to the real backend over HTTP.
pub struct HttpJoinBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpJoinBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Decode the structured error body of a failed response and map the
    /// status code to the user-facing taxonomy.
    async fn error_from_response(
        resp: reqwest::Response,
        conflict_fallback: &str,
        bad_input: &str,
        fallback: &str,
    ) -> BackendError {
        let status = resp.status();
        let envelope: ApiEnvelope<ErrorBody> = match resp.json().await {
            Ok(env) => env,
            Err(_) => return BackendError::MalformedResponse,
        };
        let body = envelope.data;

        if let Some(body) = &body {
            if body.is_conflict() {
                return BackendError::Conflict {
                    code: body.code.clone(),
                    message: body
                        .error_message
                        .clone()
                        .unwrap_or_else(|| conflict_fallback.to_string()),
                };
            }
        }

        map_status(status, body.as_ref(), bad_input, fallback)
    }
}

/// Map a non-success status to its fixed user-facing message.
fn map_status(
    status: StatusCode,
    body: Option<&ErrorBody>,
    bad_input: &str,
    fallback: &str,
) -> BackendError {
    match status.as_u16() {
        400 => BackendError::BadInput {
            message: bad_input.to_string(),
        },
        429 => BackendError::RateLimited {
            message: MSG_RATE_LIMITED.to_string(),
        },
        500..=599 => BackendError::ServerInternal {
            message: MSG_SERVER_INTERNAL.to_string(),
        },
        other => BackendError::Unexpected {
            status: other,
            message: body
                .and_then(|b| b.error_message.clone())
                .unwrap_or_else(|| fallback.to_string()),
        },
    }
}

/// Map a reqwest transport error: failed sends are connectivity problems,
/// undecodable bodies are protocol problems.
fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        BackendError::MalformedResponse
    } else {
        BackendError::Connectivity
    }
}

#[async_trait]
impl JoinBackend for HttpJoinBackend {
    async fn check_phone_duplicate(&self, phone: &str) -> Result<(), BackendError> {
        let url = self.url(PHONE_VALIDATION_ENDPOINT);
        tracing::info!(%url, "checking phone for duplicates");

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status().is_success() {
            // data is null when the number is available
            return Ok(());
        }

        let err = Self::error_from_response(
            resp,
            MSG_DUPLICATE_PHONE,
            MSG_BAD_PHONE,
            MSG_PHONE_CHECK_FAILED,
        )
        .await;
        tracing::warn!(error = %err, "phone duplicate check failed");
        Err(err)
    }

    async fn send_sms_code(&self, phone: &str) -> Result<String, BackendError> {
        let url = self.url(SMS_VERIFICATION_ENDPOINT);
        tracing::info!(%url, "dispatching SMS verification code");

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            let err =
                Self::error_from_response(resp, MSG_DUPLICATE_PHONE, MSG_BAD_PHONE, MSG_SMS_FAILED)
                    .await;
            tracing::warn!(error = %err, "SMS dispatch failed");
            return Err(err);
        }

        let envelope: ApiEnvelope<AuthCodeData> =
            resp.json().await.map_err(|_| BackendError::MalformedResponse)?;
        match envelope.data {
            Some(data) if !data.auth_code.is_empty() => Ok(data.auth_code),
            _ => Err(BackendError::MalformedResponse),
        }
    }

    async fn worker_join(&self, payload: &SignupPayload) -> Result<JoinOutcome, BackendError> {
        let url = self.url(WORKER_JOIN_ENDPOINT);
        tracing::info!(%url, "submitting worker join request");

        let request_json =
            serde_json::to_string(payload).map_err(|_| BackendError::MalformedResponse)?;

        // The backend expects the JSON under a `request` part plus three
        // image parts, empty until uploads are implemented.
        let form = Form::new()
            .text("request", request_json)
            .text("educationCertificateImage", "")
            .text("workerCardImage", "")
            .text("signatureImage", "");

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            let err = Self::error_from_response(
                resp,
                MSG_DUPLICATE_ACCOUNT,
                MSG_JOIN_BAD_INPUT,
                MSG_JOIN_FAILED,
            )
            .await;
            tracing::warn!(error = %err, "worker join failed");
            return Err(err);
        }

        let envelope: ApiEnvelope<serde_json::Value> =
            resp.json().await.map_err(|_| BackendError::MalformedResponse)?;
        Ok(JoinOutcome {
            message: envelope.message,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginData, BackendError> {
        let url = self.url(LOGIN_ENDPOINT);
        tracing::info!(%url, "logging in");

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let value: serde_json::Value =
            resp.json().await.map_err(|_| BackendError::MalformedResponse)?;

        if status.is_success() {
            if let Some(data) = value.get("data").filter(|d| !d.is_null()) {
                return serde_json::from_value(data.clone())
                    .map_err(|_| BackendError::MalformedResponse);
            }
        }

        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or(MSG_LOGIN_FAILED)
            .to_string();
        Err(BackendError::Unexpected {
            status: status.as_u16(),
            message,
        })
    }
}
