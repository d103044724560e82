//! API key authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticates requests using the configured API key.
///
/// # Header Format
///
/// Either of:
///
/// ```text
/// X-API-Key: <key>
/// Authorization: Bearer <key>
/// ```
///
/// `X-API-Key` wins when both are present.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - No credential header is present
/// - The header is not valid ASCII / not a Bearer credential
/// - The key does not match
///
/// Runs as a route layer, so no handler logic executes for rejected requests.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match parts.headers.get(API_KEY_HEADER) {
        Some(value) => value
            .to_str()
            .map(str::to_owned)
            .map_err(|_| missing_credential())?,
        None => {
            let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
                .await
                .map_err(|_| missing_credential())?;
            token
        }
    };

    st.auth_service.authenticate(&token)?;

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

fn missing_credential() -> AppError {
    AppError::unauthorized(
        "Unauthorized",
        json!({ "reason": "Invalid or missing API key" }),
    )
}
