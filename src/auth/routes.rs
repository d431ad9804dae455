//! REST endpoints for login, logout, and session status.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::FlowError;

use super::login::LoginFlow;
use super::session::SessionStore;

/// Shared state for auth routes.
#[derive(Clone)]
pub struct AuthRouteState {
    pub flow: Arc<LoginFlow>,
    pub session: Arc<SessionStore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    login_id_or_phone: String,
    password: String,
    device_token: Option<String>,
}

/// POST /api/auth/login
async fn login(
    State(state): State<AuthRouteState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let view = state
        .flow
        .login(&body.login_id_or_phone, &body.password, body.device_token)
        .await?;
    Ok(Json(serde_json::json!({ "status": "ok", "login": view })))
}

/// POST /api/auth/logout
async fn logout(State(state): State<AuthRouteState>) -> Json<serde_json::Value> {
    let message = state.flow.logout().await;
    Json(serde_json::json!({ "status": "ok", "message": message }))
}

/// GET /api/auth/session
async fn session_status(State(state): State<AuthRouteState>) -> Json<serde_json::Value> {
    let snapshot = state.session.snapshot().await;
    Json(serde_json::json!({
        "status": "ok",
        "loggedIn": snapshot.is_some(),
        "session": snapshot,
    }))
}

/// Build the auth routes.
pub fn auth_routes(state: AuthRouteState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session_status))
        .with_state(state)
}
