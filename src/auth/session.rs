//! Refresh tokens
//!
//! A refresh token is an opaque random string with no embedded claims. Only
//! its SHA-256 digest is persisted, inside the owning user's session list.

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate a cryptographically secure refresh token (128 hex chars)
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a token for storage
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether a session that expires at `expires_at` is no longer usable
pub fn has_expired(expires_at: DateTime<Utc>) -> bool {
    expires_at <= Utc::now()
}
