use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::search::SearchOrchestrator;

pub mod handlers;
pub mod models;

pub fn create_router(orchestrator: Arc<SearchOrchestrator>, static_dir: impl AsRef<Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route(
            "/api/search",
            get(handlers::search_get_handler).post(handlers::search_handler),
        )
        .route(
            "/api/placeholder/:width/:height",
            get(handlers::placeholder_handler),
        )
        .with_state(orchestrator)
        // Static file serving for the UI
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
}
