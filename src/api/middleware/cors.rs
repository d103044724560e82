//! CORS policy for the management front end.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::middleware::auth::API_KEY_HEADER;

/// Creates a CORS layer allowing the configured browser origins.
///
/// Origins that are not valid header values are skipped with a warning. An
/// empty list disables cross-origin access entirely.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api", api_routes())
///     .layer(cors::layer(&["http://localhost:3000".to_string()]));
/// ```
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(API_KEY_HEADER),
        ])
}
