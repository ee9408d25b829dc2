use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Uploaded recordings can be a few minutes of LINEAR16 audio.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Listing page
        .route("/", get(handlers::index))
        // Upload pipelines
        .route("/upload", post(handlers::upload_audio))
        .route("/upload_text", post(handlers::upload_text))
        // File access
        .route("/uploads/:filename", get(handlers::serve_upload))
        // Legacy path serving from the process working directory
        .route("/upload/:filename", get(handlers::serve_legacy))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
