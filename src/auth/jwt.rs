//! JWT access tokens
//!
//! Access tokens are short-lived HS256 JWTs carrying only the user id and
//! the validity window. They are signed with the process-wide secret, which
//! keeps verification free of any store lookup.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(rename = "_id")]
    pub user_id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate an access token for a user
///
/// # Arguments
/// * `user_id` - The authenticated user
/// * `secret` - JWT signing secret
/// * `ttl_seconds` - Token time-to-live in seconds
pub fn generate_access_token(
    user_id: Uuid,
    secret: &str,
    ttl_seconds: i64,
) -> Result<IssuedToken, JwtError> {
    let now = Utc::now();
    let expires_at = Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| JwtError::EncodingFailed("token lifetime out of range".to_string()))?;

    let claims = Claims {
        user_id: user_id.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

    Ok(IssuedToken {
        token,
        // second precision, same as the embedded `exp`
        expires_at: Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at),
    })
}

/// Verify and decode a JWT token
///
/// Rejects malformed tokens, bad signatures and tokens whose `exp` has
/// passed. No clock leeway is granted.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::DecodingFailed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Extract user ID from claims
pub fn get_user_id_from_claims(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.user_id).map_err(|e| JwtError::InvalidToken(e.to_string()))
}

/// Verify a token and resolve the user it was issued to
pub fn verify_access_token(token: &str, secret: &str) -> Result<Uuid, JwtError> {
    let claims = verify_token(token, secret)?;
    get_user_id_from_claims(&claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn test_generate_access_token() {
        let user_id = Uuid::new_v4();

        let issued = generate_access_token(user_id, SECRET, 900).unwrap();
        assert!(!issued.token.is_empty());
        assert!(issued.expires_at > Utc::now());

        let claims = verify_token(&issued.token, SECRET).unwrap();
        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(verify_access_token(&issued.token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token() {
        let issued = generate_access_token(Uuid::new_v4(), SECRET, -10).unwrap();
        let result = verify_token(&issued.token, SECRET);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_lifetime_out_of_range() {
        let result = generate_access_token(Uuid::new_v4(), SECRET, i64::MAX);
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let issued = generate_access_token(Uuid::new_v4(), "secret1", 900).unwrap();
        let result = verify_token(&issued.token, "secret2");
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_payload() {
        let issued = generate_access_token(Uuid::new_v4(), SECRET, 900).unwrap();
        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        let other = generate_access_token(Uuid::new_v4(), "other", 900).unwrap();
        parts[1] = other.token.split('.').nth(1).unwrap().to_string();

        let result = verify_token(&parts.join("."), SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            user_id: "not-a-uuid".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(
            get_user_id_from_claims(&claims),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
