//! Redirect resolver: short code → destination, counting each resolution.

use std::sync::Arc;

use crate::application::services::link_service::short_link_not_found;
use crate::domain::repositories::LinkRepository;
use crate::domain::reserved_codes::ReservedCodes;
use crate::error::AppError;

/// Public, unauthenticated resolution path.
///
/// Reserved codes are rejected before storage is touched so that system
/// routes never reveal registry state. The counter increment and the
/// destination lookup are one store statement, so concurrent resolutions of
/// the same code never lose a click.
pub struct RedirectService<L: LinkRepository> {
    link_repository: Arc<L>,
    reserved: ReservedCodes,
}

impl<L: LinkRepository> RedirectService<L> {
    /// Creates a new resolver.
    pub fn new(link_repository: Arc<L>, reserved: ReservedCodes) -> Self {
        Self {
            link_repository,
            reserved,
        }
    }

    /// Resolves `code` to its destination and records one click.
    ///
    /// The destination is returned exactly as stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is reserved or unknown.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if self.reserved.contains(code) {
            tracing::debug!(%code, "Reserved code requested");
            return Err(short_link_not_found(code));
        }

        match self.link_repository.record_click(code).await? {
            Some(destination) => Ok(destination),
            None => {
                tracing::debug!(%code, "Unknown short code");
                Err(short_link_not_found(code))
            }
        }
    }
}
