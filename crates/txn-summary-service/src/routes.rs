//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, summary, upload};
use crate::state::AppState;

/// Maximum concurrent uploads.
///
/// Each upload buffers its whole file and holds a write transaction while it
/// commits, and `SQLite` admits a single writer at a time.
const UPLOAD_MAX_CONCURRENT_REQUESTS: usize = 4;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `POST /upload/` - Upload a CSV file of transactions (multipart field `file`)
/// - `GET /summary/:user_id?start_date=..&end_date=..` - Amount statistics for a user
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let upload_routes = Router::new()
        .route("/upload/", post(upload::upload_file))
        .route("/upload", post(upload::upload_file))
        .layer(ConcurrencyLimitLayer::new(UPLOAD_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .route("/summary/:user_id", get(summary::get_summary))
        .merge(upload_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Replaces axum's 2 MB default; the upload handler maps overflow to a JSON 413.
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
