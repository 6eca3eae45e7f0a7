//! HTTP backend of the task board.
//!
//! Serves the JSON task API under `/api` and the compiled client for every
//! other path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(store: impl TaskStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Builds the full application: API routes, static client fallback, request
/// tracing and permissive CORS.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    routes::api_routes()
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
