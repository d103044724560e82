//! Handlers for link management endpoints (create, list, stats, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, LinkStatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, or returns the existing one for the same URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/redir",
///   "custom_code": "gohere"   // optional
/// }
/// ```
///
/// Creating a link for a URL that is already registered returns the stored
/// link with `201 Created` as well; no second row is written.
///
/// # Errors
///
/// Returns 422 Unprocessable Entity if the URL or code is malformed, or a new
/// link would use a code that collides with a system route.
/// Returns 409 Conflict if the custom code is already taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.original_url, payload.custom_code)
        .await?;

    let short_url = state.short_url(&link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists every link, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.short_code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Returns usage statistics for a short link.
///
/// # Endpoint
///
/// `GET /api/links/{code}/stats`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn link_stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let link = state.link_service.get_link_by_code(&code).await?;

    Ok(Json(link.into()))
}

/// Permanently deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// The row is removed; the code can be claimed again immediately and
/// subsequent redirects return 404.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
