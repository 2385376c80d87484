//! Request handlers. Every failure maps to a fixed taxonomy: validation
//! errors are rejected before any model call (400), a missing API key is a
//! configuration error surfaced before dispatch (503), and service failures
//! terminate only the one operation that raised them (502).

use crate::GatewayState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use firecode_core::{
    ChatMessage, ChatSession, Controller, GenerateError, GenerationPhase, LlmClient, LlmError,
    SavedReport, SearchParams, SledKv, User, DEFECT_CATEGORIES,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

type Shared = State<Arc<GatewayState>>;
type ApiError = (StatusCode, Json<ErrorBody>);

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn err(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

fn error_status(e: &LlmError) -> StatusCode {
    if e.is_config() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::BAD_GATEWAY
    }
}

// -- Health and checklist -------------------------------------------------------

pub async fn health(State(state): Shared) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "app": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "model_configured": state.bridge.is_some(),
    }))
}

#[derive(Serialize)]
pub struct ChecklistGroup {
    pub title: &'static str,
    pub items: Vec<&'static str>,
}

pub async fn checklist() -> Json<Vec<ChecklistGroup>> {
    Json(
        DEFECT_CATEGORIES
            .iter()
            .map(|c| ChecklistGroup { title: c.title, items: c.items.to_vec() })
            .collect(),
    )
}

// -- Session/auth gate ----------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(State(state): Shared, Json(req): Json<LoginRequest>) -> Result<Json<User>, ApiError> {
    let mut controller = state.controller.lock().await;
    controller
        .login(&req.email, &req.password)
        .map(Json)
        .map_err(auth_error)
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): Shared,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut controller = state.controller.lock().await;
    controller
        .register(&req.name, &req.email, &req.password)
        .map(|()| Json(serde_json::json!({ "message": "Account created! Please log in." })))
        .map_err(auth_error)
}

pub async fn logout(State(state): Shared) -> Json<serde_json::Value> {
    state.controller.lock().await.logout();
    Json(serde_json::json!({ "message": "Logged out." }))
}

#[derive(Deserialize)]
pub struct ForgotRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): Shared,
    Json(req): Json<ForgotRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let controller = state.controller.lock().await;
    controller
        .request_password_reset(&req.email)
        .map(|message| Json(serde_json::json!({ "message": message })))
        .map_err(auth_error)
}

pub async fn me(State(state): Shared) -> Json<serde_json::Value> {
    let controller = state.controller.lock().await;
    let user = match &controller.state().auth {
        firecode_core::AuthState::LoggedIn(user) => Some(user.clone()),
        firecode_core::AuthState::LoggedOut => None,
    };
    Json(serde_json::json!({ "user": user }))
}

fn auth_error(e: firecode_core::AuthError) -> ApiError {
    use firecode_core::AuthError;
    let status = match e {
        AuthError::MissingFields => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::AlreadyRegistered => StatusCode::CONFLICT,
    };
    err(status, e.to_string())
}

// -- Report lifecycle -------------------------------------------------------------

pub async fn generate_report(
    State(state): Shared,
    Json(params): Json<SearchParams>,
) -> Result<Json<SavedReport>, ApiError> {
    let payload = {
        let mut controller = state.controller.lock().await;
        controller.set_params(params);
        match controller.begin_generate() {
            Ok(payload) => payload,
            Err(e @ GenerateError::InFlight) => return Err(err(StatusCode::CONFLICT, e.to_string())),
            Err(e) => return Err(err(StatusCode::BAD_REQUEST, e.to_string())),
        }
    };

    // The controller lock is released during the model call so other routes
    // stay responsive; a second generation attempt is refused as in-flight.
    let outcome = match &state.bridge {
        Some(bridge) => bridge.generate(&payload).await,
        None => Err(LlmError::MissingApiKey),
    };
    let status = match &outcome {
        Err(e) => Some(error_status(e)),
        Ok(_) => None,
    };

    let mut controller = state.controller.lock().await;
    match controller.finish_generate(outcome) {
        Some(report) => Ok(Json(report)),
        None => {
            let message = match &controller.state().generation {
                GenerationPhase::Failed(message) => message.clone(),
                _ => firecode_core::CONNECTIVITY_MESSAGE.to_string(),
            };
            Err(err(status.unwrap_or(StatusCode::BAD_GATEWAY), message))
        }
    }
}

pub async fn history(State(state): Shared) -> Json<Vec<SavedReport>> {
    Json(state.controller.lock().await.history())
}

#[derive(Deserialize)]
pub struct SelectHistoryRequest {
    pub id: String,
}

pub async fn select_history(
    State(state): Shared,
    Json(req): Json<SelectHistoryRequest>,
) -> Result<Json<SavedReport>, ApiError> {
    let mut controller = state.controller.lock().await;
    let report = controller
        .history()
        .into_iter()
        .find(|r| r.id == req.id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "No saved report with that id."))?;
    controller.select_history(&report);
    Ok(Json(report))
}

pub async fn go_home(State(state): Shared) -> Json<serde_json::Value> {
    state.controller.lock().await.go_home();
    Json(serde_json::json!({ "message": "Reset." }))
}

// -- Chat sessions ------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Follow-up questions grounded on the loaded report.
    Report,
    /// General Fire Code expert mode.
    Expert,
}

#[derive(Deserialize)]
pub struct OpenChatRequest {
    pub mode: ChatMode,
    /// Grounding report text; defaults to the currently loaded result.
    #[serde(default)]
    pub report_context: Option<String>,
}

#[derive(Serialize)]
pub struct OpenChatResponse {
    pub session_id: Uuid,
    pub greeting: String,
}

pub async fn open_chat(
    State(state): Shared,
    Json(req): Json<OpenChatRequest>,
) -> Result<Json<OpenChatResponse>, ApiError> {
    let bridge = require_bridge(&state)?;
    let session = match req.mode {
        ChatMode::Expert => ChatSession::open_expert(bridge),
        ChatMode::Report => {
            let context = match req.report_context {
                Some(context) => context,
                None => loaded_result(&state.controller).await.ok_or_else(|| {
                    err(StatusCode::BAD_REQUEST, "No report loaded to discuss.")
                })?,
            };
            ChatSession::open_report_chat(bridge, &context)
        }
    };
    let greeting = session.transcript()[0].text.clone();
    let session_id = Uuid::new_v4();
    state.sessions.insert(session_id, session);
    Ok(Json(OpenChatResponse { session_id, greeting }))
}

async fn loaded_result(
    controller: &tokio::sync::Mutex<Controller<SledKv>>,
) -> Option<String> {
    match &controller.lock().await.state().generation {
        GenerationPhase::Loaded(result) => Some(result.clone()),
        _ => None,
    }
}

fn require_bridge(state: &GatewayState) -> Result<Arc<firecode_core::GeminiBridge>, ApiError> {
    state
        .bridge
        .clone()
        .ok_or_else(|| err(StatusCode::SERVICE_UNAVAILABLE, LlmError::MissingApiKey.to_string()))
}

#[derive(Deserialize)]
pub struct SendChatRequest {
    pub session_id: Uuid,
    pub text: String,
}

#[derive(Serialize)]
pub struct SendChatResponse {
    pub reply: String,
    pub transcript: Vec<ChatMessage>,
}

pub async fn send_chat(
    State(state): Shared,
    Json(req): Json<SendChatRequest>,
) -> Result<Json<SendChatResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "Message text is required."));
    }
    // The session is taken out of the table for the duration of the call, so
    // a second send on the same handle is refused while one is in flight.
    let (_, mut session) = state
        .sessions
        .remove(&req.session_id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "Unknown or busy chat session."))?;
    let reply = session.send(&req.text).await;
    let transcript = session.transcript().to_vec();
    state.sessions.insert(req.session_id, session);
    Ok(Json(SendChatResponse { reply, transcript }))
}

// -- NTC generator ---------------------------------------------------------------------

#[derive(Deserialize)]
pub struct NtcRequest {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub observations: String,
}

#[derive(Serialize)]
pub struct NtcResponse {
    pub markdown: String,
}

pub async fn generate_ntc(
    State(state): Shared,
    Json(req): Json<NtcRequest>,
) -> Result<Json<NtcResponse>, ApiError> {
    let payload = {
        let controller = state.controller.lock().await;
        controller
            .begin_ntc(&req.selected, &req.observations)
            .map_err(|e| err(StatusCode::BAD_REQUEST, e.to_string()))?
    };
    let bridge = require_bridge(&state)?;
    match bridge.generate(&payload).await {
        Ok(markdown) => Ok(Json(NtcResponse { markdown })),
        Err(LlmError::EmptyResponse) => Ok(Json(NtcResponse {
            markdown: "Unable to generate defect list.".to_string(),
        })),
        Err(e) if e.is_config() => Err(err(StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
        Err(e) => {
            tracing::warn!(error = %e, "NTC generation failed");
            Err(err(
                StatusCode::BAD_GATEWAY,
                "Failed to generate legal basis list. Please try again.",
            ))
        }
    }
}
