//! Integration test: gateway routes over an in-process router (no network,
//! no model bridge — every model-backed route must fail fast with the
//! configuration error).

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use firecode_gateway::{build_router, GatewayState};
use firecode_core::{AssistantStore, Controller, CoreConfig, SledKv};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_router() -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = AssistantStore::new(SledKv::open_path(dir.path()).unwrap());
    store.seed_demo_user();
    let controller = Controller::new(store);
    let state = Arc::new(GatewayState::with_bridge(CoreConfig::default(), controller, None));
    (build_router(state), dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_app_and_missing_model_key() {
    let (router, _dir) = test_router();
    let response = router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_configured"], false);
}

#[tokio::test]
async fn checklist_exposes_all_defect_groups() {
    let (router, _dir) = test_router();
    let response = router
        .oneshot(Request::get("/api/checklist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 6);
    assert_eq!(groups[0]["title"], "Means of Egress");
    assert!(groups[2]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i == "Alarm bell/horn not audible"));
}

#[tokio::test]
async fn auth_flow_register_login_me_logout() {
    let (router, _dir) = test_router();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "name": "Juan", "email": "juan@bfp.gov.ph", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate registration conflicts.
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "name": "X", "email": "juan@bfp.gov.ph", "password": "pw2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "juan@bfp.gov.ph", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "juan@bfp.gov.ph", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["name"], "Juan");
    assert!(user.get("password").is_none());

    let response = router
        .clone()
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "juan@bfp.gov.ph");

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn report_without_api_key_fails_fast_with_config_error() {
    let (router, _dir) = test_router();
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/report",
            serde_json::json!({ "establishment_type": "Mercantile", "area": "450", "stories": "3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("GEMINI_API_KEY"));

    // The pipeline is back out of Loading: a retry reaches the same point
    // instead of being refused as in-flight, and nothing was persisted.
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/report",
            serde_json::json!({ "establishment_type": "Mercantile", "area": "450", "stories": "3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = router
        .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn incomplete_report_params_are_rejected_locally() {
    let (router, _dir) = test_router();
    let response = router
        .oneshot(json_request(
            "POST",
            "/api/report",
            serde_json::json!({ "area": "450", "stories": "3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ntc_with_no_defects_is_rejected_before_any_dispatch() {
    let (router, _dir) = test_router();
    // Bridge is absent, so reaching dispatch would give 503; the local
    // validation must win with 400.
    let response = router
        .oneshot(json_request(
            "POST",
            "/api/ntc",
            serde_json::json!({ "selected": [], "observations": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_open_requires_bridge_and_send_requires_known_session() {
    let (router, _dir) = test_router();
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/open",
            serde_json::json!({ "mode": "expert" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/chat/send",
            serde_json::json!({
                "session_id": "00000000-0000-0000-0000-000000000000",
                "text": "hello"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
