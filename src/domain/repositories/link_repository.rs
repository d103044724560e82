//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of an insert attempt.
///
/// Uniqueness violations are expected outcomes for the registry (they drive
/// collision retry and idempotent create), so they are reported here rather
/// than as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Row inserted.
    Created(Link),
    /// Another row already uses the short code.
    CodeTaken,
    /// Another row already points at the same original URL.
    UrlTaken,
}

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `click_count = 0` and fresh timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors other than
    /// uniqueness violations.
    async fn insert(&self, new_link: NewLink) -> Result<CreateOutcome, AppError>;

    /// Finds a link by its short code (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its exact original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link, newest first, ties broken by descending id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Hard-deletes a link.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if the code was unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Increments the click counter of `code` by one and returns its destination.
    ///
    /// Must be a single atomic statement in the store so that concurrent
    /// resolutions never lose an increment.
    ///
    /// Returns `Ok(None)` if the code does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_click(&self, code: &str) -> Result<Option<String>, AppError>;

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
