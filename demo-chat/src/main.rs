use std::env;

use axum::{Router, routing::get};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_gate::{AuthGate, GateConfig, build_cache_store, build_data_store};
use chat_gate_axum::GateState;

mod issuer;
mod server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,chat_gate=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match GateConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{e}; falling back to demo defaults");
            demo_config()
        }
    };

    let cache = build_cache_store(
        &env_or("GATE_CACHE_STORE_TYPE", "memory"),
        &env_or("GATE_CACHE_STORE_URL", ""),
    )
    .await?;
    let data = build_data_store(
        &env_or("GATE_DATA_STORE_TYPE", "sqlite"),
        &env_or("GATE_DATA_STORE_URL", "sqlite:demo-chat.db"),
    )?;

    let gate = AuthGate::new(config, cache, data);
    gate.init().await?;
    let state = GateState::new(gate);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .merge(issuer::router(state.clone()))
        .merge(chat_gate_axum::router(state));

    let port = env_or("CHAT_DEMO_PORT", "3001").parse()?;
    server::spawn_http_server(port, app).await?;
    Ok(())
}

/// Self-contained local setup: the stub issuer and the callback echo live on
/// this same server, so the whole flow can be clicked through on one port.
fn demo_config() -> GateConfig {
    GateConfig {
        downstream_url: "http://localhost:3001/callback".to_string(),
        issuer_authorize_url: "http://localhost:3001/authorize".to_string(),
        client_id: "demo-chat".to_string(),
        redirect_uri: "http://localhost:3001/callback".to_string(),
        profile_path: chat_gate::DEFAULT_PROFILE_PATH.to_string(),
        state_ttl: chat_gate::DEFAULT_STATE_TTL,
        token_secret: b"demo-only-signing-secret".to_vec(),
        token_ttl: chat_gate::DEFAULT_TOKEN_TTL,
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

async fn healthz() -> &'static str {
    "ok"
}
