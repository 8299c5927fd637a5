//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /s/{code}`    - Short link redirect
//! - `GET  /go/{code}`   - Same redirect, alternate prefix
//! - `GET  /health`      - Health check: storage, click queue
//! - `/api/*`            - JSON API for link management
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and the tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/s/{code}", get(redirect_handler))
        .route("/go/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps [`router`] so that `/s/abc/` and `/s/abc` resolve alike.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
