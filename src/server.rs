//! HTTP server assembly — stateless endpoints, wizard/auth routes, and
//! static serving of the front end.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthRouteState, auth_routes};
use crate::config::AppConfig;
use crate::error::FlowError;
use crate::signup::{SignupRouteState, signup_routes};

/// Shared state for the stateless endpoints.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// GET /healthz
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /readyz
async fn readyz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ready": true }))
}

/// GET /api/time
async fn server_time() -> Json<serde_json::Value> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    Json(serde_json::json!({ "now": now }))
}

#[derive(Debug, Deserialize)]
struct EchoRequest {
    message: String,
    #[serde(default = "default_count")]
    count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Serialize)]
struct EchoResponse {
    repeated: Vec<String>,
}

/// POST /api/echo — repeat `message` `count` times (1..=10, default 1).
async fn echo(Json(request): Json<EchoRequest>) -> Result<Json<EchoResponse>, FlowError> {
    if request.message.is_empty() {
        return Err(FlowError::validation("message must not be empty"));
    }
    if !(1..=10).contains(&request.count) {
        return Err(FlowError::validation("count must be between 1 and 10"));
    }
    let repeated = vec![request.message; request.count as usize];
    Ok(Json(EchoResponse { repeated }))
}

/// GET /api/config — runtime configuration for the front end.
async fn runtime_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "API_BASE_URL": state.config.api_base_url }))
}

/// Assemble the full application router.
pub fn build_router(
    config: Arc<AppConfig>,
    signup: SignupRouteState,
    auth: AuthRouteState,
) -> Router {
    let public_dir = config.public_dir.clone();
    let state = AppState { config };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/time", get(server_time))
        .route("/api/echo", post(echo))
        .route("/api/config", get(runtime_config))
        .with_state(state)
        .merge(signup_routes(signup))
        .merge(auth_routes(auth))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}
