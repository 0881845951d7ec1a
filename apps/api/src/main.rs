mod admin;
mod auth;
mod config;
mod correction;
mod entitlement;
mod errors;
mod grading;
mod models;
mod routes;
mod session;
mod state;
mod store;
mod themes;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::AuthClient;
use crate::config::Config;
use crate::grading::gemini::GeminiGrader;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("mag_api={},tower_http=info", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MAG Redação API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the profile/correction database
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    info!("Profile database pool established");
    let store = Arc::new(PgStore::new(pool));

    // Initialize grading client
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; grading will rely on client-held override keys");
    }
    let grader = Arc::new(GeminiGrader::new(config.gemini_api_key.clone()));
    info!("Grading client initialized (model: {})", grading::gemini::MODEL);

    // Initialize auth client
    let auth = AuthClient::new(config.auth_base_url.clone(), config.auth_api_key.clone());
    info!("Auth client initialized ({})", config.auth_base_url);

    // Build app state
    let state = AppState {
        store,
        grader,
        auth,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
