//! Rate-limited HTTP gateway in front of an LLM API.
//!
//! Every `/api` route sits behind [`gate::access_gate`], which checks the
//! optional shared secret and then the per-key sliding-window
//! [`rate_limit::RateLimiter`] before the handler runs.

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod webhook;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    ask_handler, health_handler, image_handler, index_handler, metrics_handler, notify_handler, pdf_handler,
};
use crate::state::AppState;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use rate_limit::RateLimiter;

//creating the router with routes
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/ask", post(ask_handler))
        .route("/pdf", post(pdf_handler))
        .route("/image", post(image_handler))
        .route("/notify", post(notify_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::access_gate));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
