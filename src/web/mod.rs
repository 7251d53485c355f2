//! HTTP front end: the upload page and its analysis endpoint.

pub mod handlers;
pub mod page;
pub mod types;

use crate::web::handlers::{analyze_handler, health_handler, index_handler};
pub use crate::web::types::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    let request_body_limit = RequestBodyLimitLayer::new(state.max_upload_bytes);

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/healthz", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(request_body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
