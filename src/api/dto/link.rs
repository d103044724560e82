//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;
use crate::utils::code_generator::CUSTOM_CODE_REGEX;

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The destination URL (absolute HTTP/HTTPS).
    #[validate(length(min = 5, max = 2000))]
    pub original_url: String,

    /// Optional custom short code (3-20 of `A-Za-z0-9_-`).
    #[validate(regex(path = *CUSTOM_CODE_REGEX))]
    pub custom_code: Option<String>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            short_url,
            click_count: link.click_count,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Usage statistics for a single link.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkStatsResponse {
    fn from(link: Link) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}
