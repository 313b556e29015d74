pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, Variant};
pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/analyser", post(routes::analyser))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
