mod auth;
mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod resume;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::render::pdf::{ChromePdfRenderer, PdfRenderer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{ArtifactStore, FsArtifactStore};

/// Whole-request cap: resume fields are small and photo uploads are
/// bounded, so anything larger is rejected at the framework boundary.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the text-generation capability
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize the HTML-to-PDF capability
    let renderer: Arc<dyn PdfRenderer> = Arc::new(ChromePdfRenderer);
    info!("PDF renderer initialized (headless Chrome)");

    // Initialize the artifact store
    let store: Arc<dyn ArtifactStore> =
        Arc::new(FsArtifactStore::new(config.artifacts_dir.clone()));
    info!("Artifact store rooted at {}", config.artifacts_dir.display());

    // Build app state
    let state = AppState {
        llm,
        renderer,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
