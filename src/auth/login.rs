//! Login flow — local validation, the backend call, and session storage.

use std::sync::Arc;

use regex::Regex;

use crate::backend::{JoinBackend, LoginRequest};
use crate::error::FlowError;

use super::session::SessionStore;

/// Fallback device token for browser clients.
const WEB_DEVICE_TOKEN: &str = "web_device_token";

const MSG_NEED_ID: &str = "아이디 또는 전화번호를 입력해주세요.";
const MSG_BAD_ID: &str = "올바른 아이디 또는 전화번호 형식이 아닙니다.";
const MSG_NEED_PASSWORD: &str = "비밀번호를 입력해주세요.";
const MSG_PASSWORD_LEN: &str = "비밀번호는 8자 이상이어야 합니다.";
const MSG_LOGIN_OK: &str = "로그인 성공!";
const MSG_LOGOUT_OK: &str = "로그아웃 되었습니다.";

/// Result of a successful login.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub message: String,
    pub member_id: i64,
    pub role: String,
}

/// Validates credentials, calls `POST /login`, and stores the session.
pub struct LoginFlow {
    backend: Arc<dyn JoinBackend>,
    session: Arc<SessionStore>,
    id_re: Regex,
    phone_re: Regex,
}

impl LoginFlow {
    pub fn new(backend: Arc<dyn JoinBackend>, session: Arc<SessionStore>) -> Self {
        Self {
            backend,
            session,
            id_re: Regex::new(r"^[a-zA-Z0-9]{4,20}$").expect("login id pattern is valid"),
            phone_re: Regex::new(r"^010-?\d{4}-?\d{4}$").expect("login phone pattern is valid"),
        }
    }

    /// Whether the identifier reads as a login id or a domestic phone.
    pub fn id_or_phone_ok(&self, value: &str) -> bool {
        self.id_re.is_match(value) || self.phone_re.is_match(value)
    }

    fn validate(&self, id_or_phone: &str, password: &str) -> Result<(), FlowError> {
        if id_or_phone.is_empty() {
            return Err(FlowError::validation(MSG_NEED_ID));
        }
        if !self.id_or_phone_ok(id_or_phone) {
            return Err(FlowError::validation(MSG_BAD_ID));
        }
        if password.is_empty() {
            return Err(FlowError::validation(MSG_NEED_PASSWORD));
        }
        if password.chars().count() < 8 {
            return Err(FlowError::validation(MSG_PASSWORD_LEN));
        }
        Ok(())
    }

    /// Validate locally, call the backend, and store the session group on
    /// success.
    pub async fn login(
        &self,
        id_or_phone: &str,
        password: &str,
        device_token: Option<String>,
    ) -> Result<LoginView, FlowError> {
        let id_or_phone = id_or_phone.trim();
        let password = password.trim();
        self.validate(id_or_phone, password)?;

        let request = LoginRequest {
            login_id_or_phone: id_or_phone.to_string(),
            password: password.to_string(),
            device_token: device_token.unwrap_or_else(|| WEB_DEVICE_TOKEN.to_string()),
        };

        let data = self.backend.login(&request).await?;
        self.session.store_login(&data).await;
        tracing::info!(member_id = data.member_id, role = %data.role, "login succeeded");

        Ok(LoginView {
            message: MSG_LOGIN_OK.to_string(),
            member_id: data.member_id,
            role: data.role,
        })
    }

    /// Clear the stored session group.
    pub async fn logout(&self) -> &'static str {
        self.session.clear().await;
        tracing::info!("logged out");
        MSG_LOGOUT_OK
    }
}
