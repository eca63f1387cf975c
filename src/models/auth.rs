//! Authentication models for Listkeeper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::MAX_PASSWORD_BYTES;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Credentials submitted on signup and login
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "must be at least 8 characters"),
        custom = "validate_password_bytes"
    )]
    pub password: String,
}

/// bcrypt only reads the first 72 bytes, so longer passwords are refused
fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some(format!("must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(err);
    }
    Ok(())
}

impl CredentialsRequest {
    /// Trim and lowercase the email before it is validated or looked up
    pub fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            password: self.password,
        }
    }
}

/// Canonical form of an email address used as the unique key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User response (sanitized for API)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fresh access token minted from a valid session
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_credentials_validation() {
        let ok = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_password_length_counts_bytes() {
        let at_limit = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "a".repeat(72),
        };
        assert!(at_limit.validate().is_ok());

        // 37 two-byte characters: 37 chars, 74 bytes
        let multibyte = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "é".repeat(37),
        };
        assert!(multibyte.validate().is_err());
    }

    #[test]
    fn test_access_token_response_shape() {
        let body = serde_json::to_value(AccessTokenResponse {
            access_token: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "accessToken": "abc" }));
    }

    #[test]
    fn test_user_response_has_no_password() {
        let body = serde_json::to_value(UserResponse {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| !k.contains("password")));
    }
}
