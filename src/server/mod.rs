//! HTTP server for the idea generation and validation workflows
//!
//! Every workflow endpoint is a POST route; responses are JSON with a
//! `status` field. CORS is permissive by default and restricted when
//! origins are configured.

pub mod routes;
pub mod state;
pub mod uploads;

pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with the CORS layer applied
pub fn router(state: AppState) -> Router {
    // CORS must be the outermost layer so preflight OPTIONS requests are
    // answered before anything else
    let origins = &state.config.server.cors_origins;
    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    };

    Router::new()
        .route("/generate", post(routes::generate))
        .route("/regenerate", post(routes::regenerate))
        .route("/validate", post(routes::validate))
        .route("/deepvalidate", post(routes::deepvalidate))
        .route("/unicorn_predict", post(routes::unicorn_predict))
        .route("/rag/query", post(routes::rag_query))
        .route("/financials", post(routes::financials))
        .route("/generate-prototype", post(routes::generate_prototype))
        .route("/ingest", post(routes::ingest))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until interrupted
pub async fn run_server(state: AppState) -> Result<(), String> {
    let app = router(state.clone());

    let addr: SocketAddr = format!("{}:{}", state.config.server.bind, state.config.server.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Genesis server listening on http://{}", addr);
    log::info!("Model: {}", state.config.gemini.model);
    log::info!(
        "Features: search={}, firestore={}, sheets={}",
        if state.config.search.is_some() { "on" } else { "off" },
        if state.store.is_some() { "on" } else { "off" },
        if state.sheets.is_some() { "on" } else { "off" },
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutdown signal received, stopping server...");
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}
