//! firecode-gateway: browser-facing JSON surface over the assistant core.
//!
//! One gateway hosts one inspector's assistant (the controller is a single
//! application-state object, not a multi-tenant server). CORS is left
//! permissive so the UI can be embedded in an iframe.

pub mod handlers;

use dashmap::DashMap;
use firecode_core::{ChatSession, Controller, CoreConfig, GeminiBridge, SledKv};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared gateway state: the single controller, the model bridge (absent when
/// no API key is configured), and the open chat sessions keyed by handle.
pub struct GatewayState {
    pub config: CoreConfig,
    pub controller: Mutex<Controller<SledKv>>,
    pub bridge: Option<Arc<GeminiBridge>>,
    pub sessions: DashMap<Uuid, ChatSession<GeminiBridge>>,
}

impl GatewayState {
    pub fn new(config: CoreConfig, controller: Controller<SledKv>) -> Self {
        let bridge = match GeminiBridge::from_config(&config) {
            Ok(bridge) => Some(Arc::new(bridge)),
            Err(e) => {
                tracing::warn!("model bridge unavailable: {}", e);
                None
            }
        };
        Self::with_bridge(config, controller, bridge)
    }

    /// Builds state with an explicit bridge (or none), bypassing key lookup.
    pub fn with_bridge(
        config: CoreConfig,
        controller: Controller<SledKv>,
        bridge: Option<Arc<GeminiBridge>>,
    ) -> Self {
        Self {
            config,
            controller: Mutex::new(controller),
            bridge,
            sessions: DashMap::new(),
        }
    }
}

/// Builds the full API router over the given state.
pub fn build_router(state: Arc<GatewayState>) -> axum::Router {
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;

    axum::Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/checklist", get(handlers::checklist))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/forgot", post(handlers::forgot_password))
        .route("/api/auth/me", get(handlers::me))
        .route("/api/report", post(handlers::generate_report))
        .route("/api/history", get(handlers::history))
        .route("/api/history/select", post(handlers::select_history))
        .route("/api/home", post(handlers::go_home))
        .route("/api/chat/open", post(handlers::open_chat))
        .route("/api/chat/send", post(handlers::send_chat))
        .route("/api/ntc", post(handlers::generate_ntc))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
