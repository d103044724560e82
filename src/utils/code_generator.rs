//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly, with replacement, from the 62 ASCII
//! letters and digits. Custom codes supplied by callers are checked against a
//! length bound and a restricted character set.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Symbols used for generated codes.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated codes (62^6 ≈ 56.8 billion combinations).
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Bounds accepted for the configured generated-code length.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Bounds for caller-supplied custom codes.
pub const CUSTOM_CODE_MIN_LENGTH: usize = 3;
pub const CUSTOM_CODE_MAX_LENGTH: usize = 20;

/// How the registry allocates codes when the caller does not request one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeAllocation {
    /// Length of every generated code.
    pub length: usize,
    /// Give up after this many collisions. `None` retries until a free code
    /// is found.
    pub max_attempts: Option<u32>,
}

impl Default for CodeAllocation {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            max_attempts: None,
        }
    }
}

impl CodeAllocation {
    /// Returns true once `attempts` draws have been used up.
    pub fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Generates a random short code of `length` characters from [`ALPHABET`].
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Full custom code rule: allowed characters and length bounds.
///
/// Shared by [`validate_custom_code`] and the HTTP request validation.
pub static CUSTOM_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[A-Za-z0-9_-]{{{CUSTOM_CODE_MIN_LENGTH},{CUSTOM_CODE_MAX_LENGTH}}}$"
    ))
    .expect("valid custom code regex")
});

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters (either case), digits, hyphen, underscore
///
/// Codes are case-sensitive; `MyCode` and `mycode` are different codes.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let len = code.chars().count();
    if !(CUSTOM_CODE_MIN_LENGTH..=CUSTOM_CODE_MAX_LENGTH).contains(&len) {
        return Err(AppError::bad_request(
            format!(
                "Custom code must be {CUSTOM_CODE_MIN_LENGTH}-{CUSTOM_CODE_MAX_LENGTH} characters"
            ),
            json!({ "provided_length": len }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
