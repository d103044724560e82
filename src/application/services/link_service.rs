//! Link registry: creation, lookup, listing, and deletion of short links.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{CreateOutcome, LinkRepository};
use crate::domain::reserved_codes::ReservedCodes;
use crate::error::AppError;
use crate::utils::code_generator::{CodeAllocation, generate_code, validate_custom_code};
use crate::utils::url_validator::validate_destination_url;
use serde_json::json;

/// Service owning the short code → URL mapping.
///
/// Guarantees that codes are unique and that creating a link for a URL that
/// is already registered returns the existing link instead of a duplicate.
/// Custom codes in the reserved set are refused, but only when a new row
/// would be written; a request for an already registered URL still gets the
/// existing link.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    allocation: CodeAllocation,
    reserved: ReservedCodes,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service with no reserved codes.
    pub fn new(link_repository: Arc<L>, allocation: CodeAllocation) -> Self {
        Self {
            link_repository,
            allocation,
            reserved: ReservedCodes::default(),
        }
    }

    /// Refuses `reserved` as custom codes.
    pub fn with_reserved_codes(mut self, reserved: ReservedCodes) -> Self {
        self.reserved = reserved;
        self
    }

    /// Creates a short link, or returns the existing one for the same URL.
    ///
    /// # Deduplication
    ///
    /// Matching is on the exact `original_url` string. An existing link is
    /// returned unchanged, counter included, even when `custom_code` differs.
    ///
    /// # Code Selection
    ///
    /// - If `custom_code` is provided, it is validated and inserted as-is
    /// - Otherwise a random code is drawn; a collision, whether seen by the
    ///   pre-check or by the store's uniqueness constraint, draws again
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid,
    /// or the custom code is reserved and the URL is not yet registered.
    /// Returns [`AppError::Conflict`] if the custom code is already taken.
    /// Returns [`AppError::Unavailable`] if allocation hits its attempt cap.
    pub async fn create_link(
        &self,
        original_url: String,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        validate_destination_url(&original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(code) = &custom_code {
            validate_custom_code(code)?;
        }

        if let Some(existing) = self
            .link_repository
            .find_by_original_url(&original_url)
            .await?
        {
            tracing::debug!(code = %existing.short_code, "URL already registered");
            return Ok(existing);
        }

        match custom_code {
            Some(code) => self.insert_custom(code, original_url).await,
            None => self.insert_generated(original_url).await,
        }
    }

    async fn insert_custom(&self, code: String, original_url: String) -> Result<Link, AppError> {
        if self.reserved.contains(&code) {
            return Err(AppError::bad_request(
                "This code is reserved",
                json!({ "code": code }),
            ));
        }

        let new_link = NewLink {
            short_code: code.clone(),
            original_url: original_url.clone(),
        };

        match self.link_repository.insert(new_link).await? {
            CreateOutcome::Created(link) => {
                tracing::info!(code = %link.short_code, "Link created");
                Ok(link)
            }
            CreateOutcome::CodeTaken => Err(AppError::conflict(
                "Short code already taken",
                json!({ "code": code }),
            )),
            CreateOutcome::UrlTaken => self.existing_after_race(&original_url).await,
        }
    }

    /// Draws codes until one is inserted.
    ///
    /// Unbounded unless [`CodeAllocation::max_attempts`] is set; with 62^6
    /// codes a collision is already rare, so the loop terminates in practice.
    async fn insert_generated(&self, original_url: String) -> Result<Link, AppError> {
        let mut attempts: u32 = 0;

        loop {
            if self.allocation.exhausted(attempts) {
                tracing::warn!(attempts, "Short code allocation exhausted");
                return Err(AppError::unavailable(
                    "Failed to generate unique code",
                    json!({ "attempts": attempts }),
                ));
            }
            attempts = attempts.saturating_add(1);

            let code = generate_code(self.allocation.length);

            if self.reserved.contains(&code) {
                continue;
            }

            if self.link_repository.find_by_code(&code).await?.is_some() {
                tracing::debug!(%code, attempts, "Generated code collides, retrying");
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                original_url: original_url.clone(),
            };

            match self.link_repository.insert(new_link).await? {
                CreateOutcome::Created(link) => {
                    tracing::info!(code = %link.short_code, attempts, "Link created");
                    return Ok(link);
                }
                CreateOutcome::CodeTaken => {
                    tracing::debug!(attempts, "Generated code taken on insert, retrying");
                }
                CreateOutcome::UrlTaken => return self.existing_after_race(&original_url).await,
            }
        }
    }

    /// Returns the link a concurrent request created for the same URL.
    async fn existing_after_race(&self, original_url: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_original_url(original_url)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Link vanished during creation",
                    json!({ "original_url": original_url }),
                )
            })
    }

    /// Lists all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_all().await
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| short_link_not_found(code))
    }

    /// Permanently deletes a link. The code can be reused right away.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.link_repository.delete_by_code(code).await? {
            return Err(short_link_not_found(code));
        }

        tracing::info!(%code, "Link deleted");
        Ok(())
    }

    /// Number of stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }
}

pub(crate) fn short_link_not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::ALPHABET;
    use chrono::Utc;
    use mockall::Sequence;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        let now = Utc::now();
        Link::new(id, code.to_string(), url.to_string(), 0, now, now)
    }

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), CodeAllocation::default())
    }

    #[tokio::test]
    async fn test_create_link_generates_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_link| {
                new_link.short_code.len() == 6
                    && new_link.short_code.bytes().all(|b| ALPHABET.contains(&b))
                    && new_link.original_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| {
                Ok(CreateOutcome::Created(create_test_link(
                    1,
                    &new_link.short_code,
                    &new_link.original_url,
                )))
            });

        let link = service(repo)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.short_code.len(), 6);
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_create_link_returns_existing_for_same_url() {
        let mut repo = MockLinkRepository::new();

        let mut existing = create_test_link(5, "existing", "https://a.com");
        existing.click_count = 7;
        repo.expect_find_by_original_url()
            .withf(|url| url == "https://a.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);
        repo.expect_find_by_code().times(0);

        let link = service(repo)
            .create_link("https://a.com".to_string(), Some("other".to_string()))
            .await
            .unwrap();

        assert_eq!(link.id, 5);
        assert_eq!(link.short_code, "existing");
        assert_eq!(link.click_count, 7);
    }

    #[tokio::test]
    async fn test_create_link_does_not_normalize_url() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .withf(|url| url == "HTTPS://Example.COM:443/Path#frag")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_link| new_link.original_url == "HTTPS://Example.COM:443/Path#frag")
            .times(1)
            .returning(|new_link| {
                Ok(CreateOutcome::Created(create_test_link(
                    1,
                    &new_link.short_code,
                    &new_link.original_url,
                )))
            });

        let link = service(repo)
            .create_link(
                "HTTPS://Example.COM:443/Path#frag".to_string(),
                Some("keepit".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.original_url, "HTTPS://Example.COM:443/Path#frag");
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let repo = MockLinkRepository::new();

        let result = service(repo)
            .create_link("not-a-url".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_link_invalid_custom_code() {
        let repo = MockLinkRepository::new();

        let result = service(repo)
            .create_link("https://example.com".to_string(), Some("a b".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_code().times(0);
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "gohere")
            .times(1)
            .returning(|new_link| {
                Ok(CreateOutcome::Created(create_test_link(
                    10,
                    &new_link.short_code,
                    &new_link.original_url,
                )))
            });

        let link = service(repo)
            .create_link(
                "https://example.com/redir".to_string(),
                Some("gohere".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.short_code, "gohere");
    }

    fn reserved_service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        service(repo).with_reserved_codes(ReservedCodes::new(["api", "health"]))
    }

    #[tokio::test]
    async fn test_create_link_reserved_custom_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert().times(0);

        let result = reserved_service(repo)
            .create_link("https://example.com".to_string(), Some("api".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_link_reserved_code_for_known_url_returns_existing() {
        let mut repo = MockLinkRepository::new();

        let existing = create_test_link(3, "known", "https://a.com");
        repo.expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let link = reserved_service(repo)
            .create_link("https://a.com".to_string(), Some("api".to_string()))
            .await
            .unwrap();

        assert_eq!(link.short_code, "known");
    }

    #[tokio::test]
    async fn test_create_link_custom_code_conflict() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Ok(CreateOutcome::CodeTaken));

        let result = service(repo)
            .create_link("https://b.com".to_string(), Some("taken".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_precheck_collision() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://other.com"))));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| {
                Ok(CreateOutcome::Created(create_test_link(
                    2,
                    &new_link.short_code,
                    &new_link.original_url,
                )))
            });

        let link = service(repo)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.id, 2);
    }

    #[tokio::test]
    async fn test_create_link_retries_on_insert_collision() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CreateOutcome::CodeTaken));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| {
                Ok(CreateOutcome::Created(create_test_link(
                    3,
                    &new_link.short_code,
                    &new_link.original_url,
                )))
            });

        let link = service(repo)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.id, 3);
    }

    #[tokio::test]
    async fn test_create_link_allocation_exhausted() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(3)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://other.com"))));
        repo.expect_insert().times(0);

        let service = LinkService::new(
            Arc::new(repo),
            CodeAllocation {
                length: 6,
                max_attempts: Some(3),
            },
        );

        let result = service
            .create_link("https://example.com".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_create_link_url_race_returns_winner() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CreateOutcome::UrlTaken));
        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|url| Ok(Some(create_test_link(9, "winner", url))));

        let link = service(repo)
            .create_link("https://a.com".to_string(), Some("loser".to_string()))
            .await
            .unwrap();

        assert_eq!(link.short_code, "winner");
    }

    #[tokio::test]
    async fn test_get_link_by_code_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(repo).get_link_by_code("nope").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_link_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_by_code()
            .withf(|code| code == "byebye")
            .times(1)
            .returning(|_| Ok(true));

        assert!(service(repo).delete_link("byebye").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_by_code().times(1).returning(|_| Ok(false));

        let result = service(repo).delete_link("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_links_passes_through_order() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_all().times(1).returning(|| {
            Ok(vec![
                create_test_link(2, "two", "https://two.com"),
                create_test_link(1, "one", "https://one.com"),
            ])
        });

        let links = service(repo).list_links().await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].short_code, "two");
        assert_eq!(links[1].short_code, "one");
    }
}
