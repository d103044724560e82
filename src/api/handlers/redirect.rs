//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` (public, no authentication)
///
/// # Request Flow
///
/// 1. Reject reserved codes (system route names) without touching storage
/// 2. Increment the click counter and read the destination in one statement
/// 3. Return 307 Temporary Redirect
///
/// 307 keeps the request method and is not cached as permanent, since the
/// mapping can be deleted later.
///
/// # Errors
///
/// Returns 404 Not Found if the short code is reserved or doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let destination = state.redirect_service.resolve(&code).await?;

    Ok(Redirect::temporary(&destination))
}
