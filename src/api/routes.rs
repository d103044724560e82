//! API route configuration.
//!
//! All API endpoints require the API key via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, link_stats_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// All API routes, protected by API key authentication.
///
/// # Endpoints
///
/// - `GET    /links`               - List every link, newest first
/// - `POST   /links`               - Create a short link (idempotent per URL)
/// - `GET    /links/{code}/stats`  - Click count and timestamps for one link
/// - `DELETE /links/{code}`        - Permanently delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{code}", delete(delete_link_handler))
        .route("/links/{code}/stats", get(link_stats_handler))
}
