//! REST endpoints driving the signup wizard.
//!
//! These are the service rendering of the original form's event handlers:
//! one route per user action, each returning the single notification message
//! the action produces.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FlowError;

use super::experience::{SkillKey, YearsBucket};
use super::manager::SignupManager;
use super::steps::FieldsPatch;

/// Shared state for signup routes.
#[derive(Clone)]
pub struct SignupRouteState {
    pub manager: Arc<SignupManager>,
}

#[derive(Debug, Deserialize)]
struct PhoneBody {
    phone: String,
}

#[derive(Debug, Deserialize)]
struct CodeBody {
    code: String,
}

#[derive(Debug, Deserialize)]
struct ExperienceBody {
    skill: SkillKey,
    years: YearsBucket,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoveQuery {
    confirm: bool,
}

/// GET /api/signup/status
async fn get_status(State(state): State<SignupRouteState>) -> Json<serde_json::Value> {
    let status = state.manager.status().await;
    Json(serde_json::json!({ "status": "ok", "wizard": status }))
}

/// PUT /api/signup/fields
async fn update_fields(
    State(state): State<SignupRouteState>,
    Json(patch): Json<FieldsPatch>,
) -> Json<serde_json::Value> {
    state.manager.update_fields(patch).await;
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/signup/step/next
async fn next_step(
    State(state): State<SignupRouteState>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let step = state.manager.advance().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "step": step,
        "stepIndex": step.index(),
    })))
}

/// POST /api/signup/step/prev
async fn prev_step(State(state): State<SignupRouteState>) -> Json<serde_json::Value> {
    let step = state.manager.retreat().await;
    Json(serde_json::json!({
        "status": "ok",
        "step": step,
        "stepIndex": step.index(),
    }))
}

/// POST /api/signup/reset
async fn reset(State(state): State<SignupRouteState>) -> Json<serde_json::Value> {
    state.manager.reset().await;
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/signup/verification/request
async fn request_code(
    State(state): State<SignupRouteState>,
    Json(body): Json<PhoneBody>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let dispatch = state.manager.request_code(&body.phone).await?;
    Ok(Json(serde_json::json!({ "status": "ok", "dispatch": dispatch })))
}

/// POST /api/signup/verification/resend
async fn resend_code(
    State(state): State<SignupRouteState>,
    Json(body): Json<PhoneBody>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let dispatch = state.manager.resend_code(&body.phone).await?;
    Ok(Json(serde_json::json!({ "status": "ok", "dispatch": dispatch })))
}

/// POST /api/signup/verification/confirm
async fn confirm_code(
    State(state): State<SignupRouteState>,
    Json(body): Json<CodeBody>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let message = state.manager.confirm_code(&body.code).await?;
    Ok(Json(serde_json::json!({ "status": "ok", "message": message })))
}

/// GET /api/signup/experience
async fn list_experience(State(state): State<SignupRouteState>) -> Json<serde_json::Value> {
    let entries = state.manager.experience().await;
    Json(serde_json::json!({ "status": "ok", "experience": entries }))
}

/// POST /api/signup/experience
async fn add_experience(
    State(state): State<SignupRouteState>,
    Json(body): Json<ExperienceBody>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let (id, message) = state.manager.add_experience(body.skill, body.years).await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "id": id,
        "message": message,
    })))
}

/// DELETE /api/signup/experience/{id}?confirm=true
async fn remove_experience(
    State(state): State<SignupRouteState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let removed = state.manager.remove_experience(id, query.confirm).await?;
    Ok(Json(serde_json::json!({ "status": "ok", "removed": removed })))
}

/// POST /api/signup/submit
async fn submit(
    State(state): State<SignupRouteState>,
) -> Result<Json<serde_json::Value>, FlowError> {
    let outcome = state.manager.submit().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": outcome.message,
        "next": outcome.next,
    })))
}

/// Build the signup wizard routes.
pub fn signup_routes(state: SignupRouteState) -> Router {
    Router::new()
        .route("/api/signup/status", get(get_status))
        .route("/api/signup/fields", put(update_fields))
        .route("/api/signup/step/next", post(next_step))
        .route("/api/signup/step/prev", post(prev_step))
        .route("/api/signup/reset", post(reset))
        .route("/api/signup/verification/request", post(request_code))
        .route("/api/signup/verification/resend", post(resend_code))
        .route("/api/signup/verification/confirm", post(confirm_code))
        .route(
            "/api/signup/experience",
            get(list_experience).post(add_experience),
        )
        .route("/api/signup/experience/{id}", delete(remove_experience))
        .route("/api/signup/submit", post(submit))
        .with_state(state)
}
