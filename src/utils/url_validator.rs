//! Destination URL validation.
//!
//! Destinations are stored and redirected to exactly as submitted: the
//! validator only decides whether a string is an acceptable absolute HTTP(S)
//! URL, it never rewrites it.

use url::Url;

/// Accepted destination length, in bytes.
pub const MIN_URL_LENGTH: usize = 5;
pub const MAX_URL_LENGTH: usize = 2000;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must be between {MIN_URL_LENGTH} and {MAX_URL_LENGTH} characters")]
    Length,

    #[error("URL must not contain whitespace")]
    Whitespace,

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("URL must be ASCII; percent-encode other characters")]
    NonAscii,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute HTTP or HTTPS URL.
///
/// # Rules
///
/// 1. Length between 5 and 2000 bytes
/// 2. No whitespace anywhere (the parser would silently strip some of it)
/// 3. No control characters and no non-ASCII characters, so the stored
///    string is always a valid `Location` header value
/// 4. Parses as an absolute URL
/// 5. Scheme is `http` or `https`
/// 6. Host is present and non-empty
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_destination_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_destination_url("not-a-url").is_err());
/// assert!(validate_destination_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination_url(input: &str) -> Result<(), UrlValidationError> {
    if !(MIN_URL_LENGTH..=MAX_URL_LENGTH).contains(&input.len()) {
        return Err(UrlValidationError::Length);
    }

    if input.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::Whitespace);
    }

    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    if !input.is_ascii() {
        return Err(UrlValidationError::NonAscii);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
