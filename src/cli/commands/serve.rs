//! HTTP API server for integration with other systems.
//!
//! Provides a REST endpoint for transcript resolution.

use crate::captions::TranscriptResult;
use crate::cli::Output;
use crate::config::Settings;
use crate::resolver::TranscriptResolver;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    resolver: Arc<TranscriptResolver>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or(settings.server.host.as_str()).to_string();
    let port = port.unwrap_or(settings.server.port);

    let resolver = Arc::new(TranscriptResolver::new(&settings)?);
    let app = router(resolver);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("Undertekst API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Transcript", "POST /transcript");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

fn router(resolver: Arc<TranscriptResolver>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/transcript", post(transcript))
        .layer(cors)
        .with_state(Arc::new(AppState { resolver }))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct TranscriptRequest {
    /// YouTube URL or video ID
    url: String,
    /// Caption language code
    #[serde(default)]
    language: Option<String>,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Failures are reported inside the record, so this always answers 200.
async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Json<TranscriptResult> {
    let result = state
        .resolver
        .resolve(&req.url, req.language.as_deref())
        .await;
    Json(result)
}
