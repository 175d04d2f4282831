use anyhow::{Context, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use super::scores::{self, ScoreState};
use crate::config::ServerConfig;
use crate::repository::ScoreRepository;

/// Build the full application router: score API under `/api`, plus the
/// built client when the config asks for static files.
pub fn build_router(repository: Arc<dyn ScoreRepository>, config: &ServerConfig) -> Result<Router> {
    let state = ScoreState { repository };

    // Configure CORS
    let allow_origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))?,
        ),
        None => AllowOrigin::from(Any),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health_check))
        .route(
            "/game/scores",
            get(scores::get_high_scores).post(scores::save_score),
        )
        .route("/game/stats/:player_id", get(scores::get_player_stats))
        .fallback(scores::not_found)
        .with_state(state);

    let mut app = Router::new().nest("/api", api);

    // Add static file serving if web_dir is provided
    if let Some(dir) = config.static_dir() {
        let index_path = dir.join("index.html");
        let serve_dir = ServeDir::new(dir).not_found_service(ServeFile::new(index_path));
        app = app.fallback_service(serve_dir);
        info!("Serving static files from: {}", dir.display());
    }

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

pub async fn run_api_server(config: &ServerConfig, repository: Arc<dyn ScoreRepository>) -> Result<()> {
    let app = build_router(repository, config)?;

    // Start server
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

async fn health_check() -> &'static str {
    "OK"
}
