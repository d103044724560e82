//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /health`      - Health check (public)
//! - `/api/*`            - Link management API (API key required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured browser origins for the management API
//! - **Authentication** - API key on every `/api` route
//!
//! Trailing-slash normalization wraps the finished router in
//! [`crate::server::run`], since a `NormalizePath` service can no longer be
//! nested or merged.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, cors, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Health check path.
pub const HEALTH_PATH: &str = "/health";

/// Prefix under which the management API is nested.
pub const API_PREFIX: &str = "/api";

/// First path segments owned by the service itself.
///
/// A short code equal to one of these would be shadowed by (or shadow) a
/// system route, so the resolver refuses them.
pub fn system_segments() -> [&'static str; 2] {
    [
        HEALTH_PATH.trim_start_matches('/'),
        API_PREFIX.trim_start_matches('/'),
    ]
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - browser origins allowed to call the API
pub fn app_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route(HEALTH_PATH, get(health_handler))
        .nest(API_PREFIX, api_router)
        .with_state(state)
        .layer(cors::layer(cors_origins))
        .layer(tracing::layer())
}
