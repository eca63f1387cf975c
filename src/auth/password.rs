//! Password hashing and verification
//!
//! Both directions run on tokio's blocking pool.

use std::fmt;
use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),

    #[error("Password exceeds 72 bytes")]
    TooLong,
}

/// bcrypt ignores every input byte past this length
pub const MAX_PASSWORD_BYTES: usize = 72;

/// A password on its way to the store.
///
/// Only [`HashedPassword`] can be persisted, so a plaintext value has to go
/// through [`Password::into_hashed`] first. Converting an already hashed
/// value is a no-op.
#[derive(Clone)]
pub enum Password {
    Plain(String),
    Hashed(HashedPassword),
}

impl Password {
    pub fn plain(plaintext: impl Into<String>) -> Self {
        Password::Plain(plaintext.into())
    }

    pub async fn into_hashed(self, cost: u32) -> Result<HashedPassword, PasswordError> {
        match self {
            Password::Hashed(hash) => Ok(hash),
            Password::Plain(plaintext) => hash_password(plaintext, cost).await,
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Plain(_) => f.write_str("Password::Plain(****)"),
            Password::Hashed(hash) => write!(f, "Password::Hashed({:?})", hash),
        }
    }
}

/// bcrypt hash in modular crypt format (`$2b$<cost>$<salt+digest>`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash read back from the store
    pub fn from_stored(hash: String) -> Result<Self, PasswordError> {
        if is_bcrypt_hash(&hash) {
            Ok(Self(hash))
        } else {
            Err(PasswordError::MalformedHash)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(****)")
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60
        && ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| value.starts_with(prefix))
}

/// Hash a plaintext password with a fresh random salt
pub async fn hash_password(plaintext: String, cost: u32) -> Result<HashedPassword, PasswordError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }

    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
        .map(HashedPassword)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Check a plaintext password against a stored hash
///
/// Input longer than [`MAX_PASSWORD_BYTES`] never matches: bcrypt would only
/// compare its prefix.
pub async fn verify_password(plaintext: String, stored_hash: String) -> Result<bool, PasswordError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }

    tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored_hash))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
        .map_err(|_| PasswordError::MalformedHash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("secret123".to_string(), TEST_COST)
            .await
            .unwrap();

        assert_ne!(hash.as_str(), "secret123");
        assert!(hash.as_str().starts_with("$2"));

        assert!(verify_password("secret123".to_string(), hash.as_str().to_string())
            .await
            .unwrap());
        assert!(!verify_password("wrong-pass".to_string(), hash.as_str().to_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("secret123".to_string(), TEST_COST)
            .await
            .unwrap();
        let b = hash_password("secret123".to_string(), TEST_COST)
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_into_hashed_is_idempotent() {
        let hashed = Password::plain("secret123")
            .into_hashed(TEST_COST)
            .await
            .unwrap();

        let again = Password::Hashed(hashed.clone())
            .into_hashed(TEST_COST)
            .await
            .unwrap();

        assert_eq!(hashed, again);
    }

    #[test]
    fn test_from_stored_rejects_plaintext() {
        assert!(HashedPassword::from_stored("secret123".to_string()).is_err());
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let rendered = format!("{:?}", Password::plain("secret123"));
        assert!(!rendered.contains("secret123"));
    }

    #[tokio::test]
    async fn test_verify_against_malformed_hash() {
        let result = verify_password("secret123".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(PasswordError::MalformedHash)));
    }

    #[tokio::test]
    async fn test_overlong_passwords_never_match() {
        let base = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password(base.clone(), TEST_COST).await.unwrap();

        assert!(verify_password(base.clone(), hash.as_str().to_string())
            .await
            .unwrap());
        assert!(!verify_password(format!("{}attacker", base), hash.as_str().to_string())
            .await
            .unwrap());

        let result = hash_password(format!("{}REALPASS", base), TEST_COST).await;
        assert!(matches!(result, Err(PasswordError::TooLong)));
    }
}
