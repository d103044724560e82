//! Classification of SQLite uniqueness violations on the `links` table.
//!
//! SQLite does not report constraint names, only a message such as
//! `UNIQUE constraint failed: links.short_code`, so the violated column is
//! recovered from that text.

/// Column whose `UNIQUE` constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    ShortCode,
    OriginalUrl,
}

/// Returns which `links` column caused a uniqueness violation, if any.
pub fn unique_violation(e: &sqlx::Error) -> Option<UniqueViolation> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    classify_message(db_err.message())
}

fn classify_message(message: &str) -> Option<UniqueViolation> {
    if message.contains("links.short_code") {
        Some(UniqueViolation::ShortCode)
    } else if message.contains("links.original_url") {
        Some(UniqueViolation::OriginalUrl)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_short_code() {
        assert_eq!(
            classify_message("UNIQUE constraint failed: links.short_code"),
            Some(UniqueViolation::ShortCode)
        );
    }

    #[test]
    fn test_classify_original_url() {
        assert_eq!(
            classify_message("UNIQUE constraint failed: links.original_url"),
            Some(UniqueViolation::OriginalUrl)
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify_message("NOT NULL constraint failed: links.id"), None);
    }

    #[test]
    fn test_non_database_error() {
        assert_eq!(unique_violation(&sqlx::Error::RowNotFound), None);
    }
}
