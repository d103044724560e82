//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short-code-to-URL mapping with its usage counter.
///
/// Instances are request-scoped copies of a stored row; the store owns the
/// authoritative state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        click_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            click_count,
            created_at,
            updated_at,
        }
    }

    /// Returns true if the link has never been resolved.
    pub fn is_unvisited(&self) -> bool {
        self.click_count == 0
    }
}

/// Input data for creating a new link.
///
/// The store assigns `id`, timestamps, and a zero click counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
}
