//! Integration tests for the signup wizard over real HTTP.
//!
//! Each test spins up a stub join backend plus the application server on
//! random ports and drives the wizard the way the front end would.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use jikjob_web::auth::{AuthRouteState, LoginFlow, SessionStore};
use jikjob_web::backend::{HttpJoinBackend, JoinBackend};
use jikjob_web::config::AppConfig;
use jikjob_web::server::build_router;
use jikjob_web::signup::{SignupManager, SignupRouteState};

const AUTH_CODE: &str = "008064";

/// Observable state of the stub backend.
#[derive(Clone, Default)]
struct BackendState {
    duplicate_phones: Arc<Mutex<HashSet<String>>>,
    sms_dispatches: Arc<Mutex<u32>>,
    join_requests: Arc<Mutex<Vec<Value>>>,
    join_part_names: Arc<Mutex<Vec<Vec<String>>>>,
}

async fn stub_validation_phone(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let phone = body["phone"].as_str().unwrap_or_default();
    if state.duplicate_phones.lock().unwrap().contains(phone) {
        (
            StatusCode::CONFLICT,
            Json(json!({
                "data": {
                    "status": "CONFLICT",
                    "code": "MEMBER-005",
                    "errorMessage": "이미 등록된 핸드폰 번호입니다."
                },
                "message": "커스텀 예외 반환"
            })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "data": null, "message": "성공" })))
    }
}

async fn stub_sms_verification(State(state): State<BackendState>) -> Json<Value> {
    *state.sms_dispatches.lock().unwrap() += 1;
    Json(json!({
        "data": { "authCode": AUTH_CODE },
        "message": "6자리 인증 코드 반환"
    }))
}

async fn stub_worker_join(
    State(state): State<BackendState>,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut request_body = None;
    let mut part_names = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let text = field.text().await.unwrap();
        if name == "request" {
            request_body = Some(serde_json::from_str::<Value>(&text).unwrap());
        }
        part_names.push(name);
    }
    state
        .join_requests
        .lock()
        .unwrap()
        .push(request_body.expect("join request must carry a request part"));
    state.join_part_names.lock().unwrap().push(part_names);
    Json(json!({ "data": null, "message": "성공" }))
}

async fn stub_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let password = body["password"].as_str().unwrap_or_default();
    if password == "hunter2hunter2" {
        (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "memberId": 1,
                    "accessToken": "access-token",
                    "refreshToken": "refresh-token",
                    "role": "ROLE_WORKER"
                },
                "message": "로그인 성공"
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "data": null,
                "message": "아이디 또는 비밀번호가 올바르지 않습니다."
            })),
        )
    }
}

/// Start the stub backend on a random port.
async fn start_backend() -> (String, BackendState) {
    let state = BackendState::default();
    let app = Router::new()
        .route("/join/validation-phone", post(stub_validation_phone))
        .route("/join/sms-verification", post(stub_sms_verification))
        .route("/join/worker/join", post(stub_worker_join))
        .route("/login", post(stub_login))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://127.0.0.1:{port}"), state)
}

/// Start the application server wired against the given backend URL.
async fn start_app(backend_url: &str) -> String {
    let config = Arc::new(AppConfig {
        api_base_url: backend_url.to_string(),
        ..AppConfig::default()
    });
    let backend: Arc<dyn JoinBackend> = Arc::new(HttpJoinBackend::new(backend_url.to_string()));
    let session = Arc::new(SessionStore::new());
    let signup = SignupRouteState {
        manager: Arc::new(SignupManager::new(Arc::clone(&backend))),
    };
    let auth = AuthRouteState {
        flow: Arc::new(LoginFlow::new(backend, Arc::clone(&session))),
        session,
    };
    let app = build_router(config, signup, auth);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://127.0.0.1:{port}")
}

async fn start_stack() -> (String, BackendState) {
    let (backend_url, backend_state) = start_backend().await;
    let app_url = start_app(&backend_url).await;
    (app_url, backend_state)
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let resp = client.post(url).json(&body).send().await.unwrap();
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    (StatusCode::from_u16(status.as_u16()).unwrap(), body)
}

#[tokio::test]
async fn full_signup_flow_round_trips_the_payload() {
    let (app, backend) = start_stack().await;
    let client = reqwest::Client::new();

    // Step 1: request a code for a well-formed phone.
    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-1234-5678" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dispatch"]["expiresInSecs"], json!(180));

    let wizard: Value = client
        .get(format!("{app}/api/signup/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wizard["wizard"]["verification"], json!("code_sent"));
    let timer = wizard["wizard"]["timer"].as_str().unwrap();
    assert!(
        timer.starts_with("03:") || timer.starts_with("02:5"),
        "unexpected countdown display: {timer}"
    );

    // Confirm with the issued code; step 1 becomes advanceable.
    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/verification/confirm"),
        json!({ "code": AUTH_CODE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("휴대폰 인증이 완료되었습니다! ✅"));

    let (status, body) = post_json(&client, format!("{app}/api/signup/step/next"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], json!("personal_info"));

    // Fill the remaining fields and add two experience entries.
    let resp = client
        .put(format!("{app}/api/signup/fields"))
        .json(&json!({
            "workerName": "김철수",
            "birth": "19900101",
            "gender": "MALE",
            "nationality": "KOREAN",
            "address": "서울특별시 중구 세종대로 110",
            "skills": ["tile", "general"],
            "bank": "국민은행",
            "accountNumber": "12345678901234",
            "accountHolder": "김철수",
            "email": "worker@example.com",
            "password": "hunter2hunter2",
            "passwordConfirm": "hunter2hunter2",
            "termsAccepted": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    for (skill, years) in [("tile", 3), ("general", 8)] {
        let (status, _) = post_json(
            &client,
            format!("{app}/api/signup/experience"),
            json!({ "skill": skill, "years": years }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Submit and inspect what actually reached the backend.
    let (status, body) = post_json(&client, format!("{app}/api/signup/submit"), json!({})).await;
    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    assert_eq!(body["next"], json!("login"));

    let joins = backend.join_requests.lock().unwrap();
    assert_eq!(joins.len(), 1);
    let payload = &joins[0];
    assert_eq!(payload["loginId"], json!("01012345678"));
    assert_eq!(payload["phone"], json!("01012345678"));
    assert_eq!(payload["email"], json!("worker@example.com"));
    assert_eq!(payload["role"], json!("ROLE_WORKER"));
    assert_eq!(payload["workerName"], json!("김철수"));
    assert_eq!(payload["nationality"], json!("KOREAN"));

    // One entry per registry entry, months = years × 12.
    let experience = payload["workExperienceRequest"].as_array().unwrap();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["tech"], json!("TILE"));
    assert_eq!(experience[0]["experienceMonths"], json!(36));
    assert_eq!(experience[1]["tech"], json!("NORMAL"));
    assert_eq!(experience[1]["experienceMonths"], json!(96));
    drop(joins);

    // The three placeholder file parts rode along with the JSON part.
    let parts = backend.join_part_names.lock().unwrap();
    assert_eq!(
        parts[0],
        vec![
            "request".to_string(),
            "educationCertificateImage".to_string(),
            "workerCardImage".to_string(),
            "signatureImage".to_string(),
        ]
    );
    drop(parts);

    // Success resets the wizard.
    let wizard: Value = client
        .get(format!("{app}/api/signup/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wizard["wizard"]["step"], json!("phone_verification"));
    assert_eq!(wizard["wizard"]["verified"], json!(false));
    assert_eq!(wizard["wizard"]["experience"], json!([]));
}

#[tokio::test]
async fn duplicate_phone_surfaces_conflict_verbatim_and_skips_dispatch() {
    let (app, backend) = start_stack().await;
    backend
        .duplicate_phones
        .lock()
        .unwrap()
        .insert("01012345678".to_string());
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-1234-5678" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("이미 등록된 핸드폰 번호입니다."));

    // The code was never dispatched.
    assert_eq!(*backend.sms_dispatches.lock().unwrap(), 0);

    let wizard: Value = client
        .get(format!("{app}/api/signup/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wizard["wizard"]["verification"], json!("failed"));

    // The flow stays re-enterable: freeing the number lets it through.
    backend.duplicate_phones.lock().unwrap().clear();
    let (status, _) = post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-1234-5678" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_phone_is_rejected_before_the_backend() {
    let (app, backend) = start_stack().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-12-5678" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("올바른 전화번호 형식을 입력해주세요. (010-0000-0000)")
    );
    assert_eq!(*backend.sms_dispatches.lock().unwrap(), 0);
}

#[tokio::test]
async fn wrong_code_leaves_the_session_retriable() {
    let (app, _backend) = start_stack().await;
    let client = reqwest::Client::new();

    post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-1234-5678" }),
    )
    .await;

    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/verification/confirm"),
        json!({ "code": "000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("인증번호가 올바르지 않습니다. 다시 확인해주세요.")
    );

    let (status, _) = post_json(
        &client,
        format!("{app}/api/signup/verification/confirm"),
        json!({ "code": AUTH_CODE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn submit_without_verification_fails_locally() {
    let (app, backend) = start_stack().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(&client, format!("{app}/api/signup/submit"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("전화번호 인증을 완료해주세요."));
    assert!(backend.join_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_experience_list_injects_the_fallback_entry() {
    let (app, backend) = start_stack().await;
    let client = reqwest::Client::new();

    post_json(
        &client,
        format!("{app}/api/signup/verification/request"),
        json!({ "phone": "010-9876-5432" }),
    )
    .await;
    post_json(
        &client,
        format!("{app}/api/signup/verification/confirm"),
        json!({ "code": AUTH_CODE }),
    )
    .await;

    client
        .put(format!("{app}/api/signup/fields"))
        .json(&json!({
            "email": "worker@example.com",
            "password": "hunter2hunter2",
            "passwordConfirm": "hunter2hunter2",
            "termsAccepted": true
        }))
        .send()
        .await
        .unwrap();

    let (status, _) = post_json(&client, format!("{app}/api/signup/submit"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let joins = backend.join_requests.lock().unwrap();
    assert_eq!(
        joins[0]["workExperienceRequest"],
        json!([{ "tech": "NORMAL", "experienceMonths": 24 }])
    );
}

#[tokio::test]
async fn experience_endpoints_enforce_uniqueness_and_confirmation() {
    let (app, _backend) = start_stack().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/experience"),
        json!({ "skill": "tile", "years": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &client,
        format!("{app}/api/signup/experience"),
        json!({ "skill": "tile", "years": 21 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("이미 해당 직종의 경력이 추가되어 있습니다."));

    // Deleting asks for confirmation first.
    let resp = client
        .delete(format!("{app}/api/signup/experience/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let resp = client
        .delete(format!("{app}/api/signup/experience/{id}?confirm=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], json!(true));

    let body: Value = client
        .get(format!("{app}/api/signup/experience"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["experience"], json!([]));
}

#[tokio::test]
async fn login_round_trip_stores_and_clears_the_session() {
    let (app, _backend) = start_stack().await;
    let client = reqwest::Client::new();

    // Bad password: surfaced from the backend, session untouched.
    let (status, body) = post_json(
        &client,
        format!("{app}/api/auth/login"),
        json!({ "loginIdOrPhone": "010-1234-5678", "password": "wrongpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        json!("아이디 또는 비밀번호가 올바르지 않습니다.")
    );

    let (status, body) = post_json(
        &client,
        format!("{app}/api/auth/login"),
        json!({ "loginIdOrPhone": "010-1234-5678", "password": "hunter2hunter2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"]["memberId"], json!(1));
    assert_eq!(body["login"]["role"], json!("ROLE_WORKER"));

    let session: Value = client
        .get(format!("{app}/api/auth/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["loggedIn"], json!(true));
    assert_eq!(session["session"]["memberId"], json!("1"));

    let (status, _) = post_json(&client, format!("{app}/api/auth/logout"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let session: Value = client
        .get(format!("{app}/api/auth/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["loggedIn"], json!(false));
}
