use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let index = static_dir.join("index.html");

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // TAP catalog proxy
        .route("/tap/sync", get(handlers::tap_sync))
        // Predictions
        .route("/predict", post(handlers::predict))
        .route("/ai/predict", post(handlers::ai_predict))
        // Statistics
        .route("/api/stats", get(handlers::get_stats))
        // Web client: static assets, unknown paths fall back to the index
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
        // Browser client calls from other origins
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
