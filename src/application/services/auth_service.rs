//! Authentication service for the management API key.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Validates the shared API key that guards the management endpoints.
///
/// The configured key is never compared directly: both sides are tagged with
/// HMAC-SHA256 under a per-process random key and the tags are verified in
/// constant time, so response timing does not depend on how much of a guess
/// matches.
pub struct AuthService {
    mac_key: [u8; 32],
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service for `api_key`.
    pub fn new(api_key: &str) -> Self {
        let mac_key: [u8; 32] = rand::rng().random();
        let expected_tag = tag(&mac_key, api_key);

        Self {
            mac_key,
            expected_tag,
        }
    }

    /// Checks a presented credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if `token` is not the configured key.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.mac_key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());

        mac.verify_slice(&self.expected_tag).map_err(|_| {
            tracing::debug!("Rejected invalid API key");
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid API key" }))
        })
    }
}

fn tag(mac_key: &[u8], value: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
    mac.update(value.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
