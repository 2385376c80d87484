//! firecode-gateway entry point: config-driven via CoreConfig, sled-backed
//! store, Gemini bridge when a key is configured.

use firecode_core::{AssistantStore, Controller, CoreConfig, SledKv};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = CoreConfig::load()?;
    tracing::info!(app = %config.app_name, port = config.port, "starting gateway");

    let kv = SledKv::open_path(&config.storage_path)?;
    let store = AssistantStore::new(kv);
    store.seed_demo_user();
    let controller = Controller::new(store);

    let port = config.port;
    let state = Arc::new(firecode_gateway::GatewayState::new(config, controller));
    if state.bridge.is_none() {
        tracing::warn!("no GEMINI_API_KEY configured; report, chat, and NTC calls will fail fast");
    }

    let app = firecode_gateway::build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
