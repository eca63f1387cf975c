//! Authentication service
//!
//! Core business logic for credential checks and session lifecycle.

use chrono::{Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use uuid::Uuid;
use validator::Validate;

use crate::db::{Store, StoreError};
use crate::models::{normalize_email, CredentialsRequest, NewUser, Session, User};

use super::jwt::{generate_access_token, IssuedToken, JwtError};
use super::password::{hash_password, verify_password, HashedPassword, Password, PasswordError};
use super::session::{generate_refresh_token, hash_token};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Refresh token lifetime out of range")]
    LifetimeOutOfRange,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::EmailTaken,
            other => AuthError::Store(other),
        }
    }
}

/// Result of a successful signup or login
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub access_token: IssuedToken,
    pub refresh_token: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_days: i64,
    bcrypt_cost: u32,
    // compared against when the email is unknown, so both rejections cost the same
    dummy_hash: OnceCell<HashedPassword>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn Store>,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_days: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
            bcrypt_cost,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Hash the dummy password up front so the first unknown-email login
    /// costs the same as every later one
    pub async fn warm_up(&self) -> Result<(), AuthError> {
        self.dummy_hash().await?;
        Ok(())
    }

    async fn dummy_hash(&self) -> Result<&HashedPassword, AuthError> {
        Ok(self
            .dummy_hash
            .get_or_try_init(|| hash_password("dummy-password".to_string(), self.bcrypt_cost))
            .await?)
    }

    /// Register a new user and open their first session
    pub async fn signup(
        &self,
        request: CredentialsRequest,
    ) -> Result<AuthenticatedSession, AuthError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let password = Password::plain(request.password)
            .into_hashed(self.bcrypt_cost)
            .await?;

        let user = self
            .store
            .insert_user(NewUser {
                email: request.email,
                password,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");

        self.open_session(user).await
    }

    /// Check credentials and open a new session
    pub async fn login(
        &self,
        request: CredentialsRequest,
    ) -> Result<AuthenticatedSession, AuthError> {
        let user = self
            .find_by_credentials(&request.email, &request.password)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        self.open_session(user).await
    }

    async fn open_session(&self, user: User) -> Result<AuthenticatedSession, AuthError> {
        let refresh_token = self.create_session(user.id).await?;
        let access_token = self.issue_access_token(user.id)?;

        Ok(AuthenticatedSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Look up a user by email and verify their password.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            let dummy = self.dummy_hash().await?;
            let _ = verify_password(password.to_string(), dummy.as_str().to_string()).await;

            tracing::warn!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let stored = HashedPassword::from_stored(user.password_hash.clone())?;
        if !verify_password(password.to_string(), stored.as_str().to_string()).await? {
            tracing::warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Issue a refresh token and append its session to the user's session list
    pub async fn create_session(&self, user_id: Uuid) -> Result<String, AuthError> {
        let refresh_token = generate_refresh_token();
        let expires_at = Duration::try_days(self.refresh_token_ttl_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or(AuthError::LifetimeOutOfRange)?;

        let session = self
            .store
            .push_session(user_id, &hash_token(&refresh_token), expires_at)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::debug!(user_id = %user_id, session_id = %session.id, "Session created");

        Ok(refresh_token)
    }

    /// Find the user owning `refresh_token`.
    ///
    /// `None` when the user does not exist or holds no matching session.
    /// Expiry is not checked here.
    pub async fn find_by_id_and_token(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<Option<(User, Session)>, AuthError> {
        let Some(user) = self.store.find_user_by_id(user_id).await? else {
            return Ok(None);
        };

        let session = user.session_by_hash(&hash_token(refresh_token)).cloned();

        Ok(session.map(|session| (user, session)))
    }

    /// Sign a fresh access token for a user
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<IssuedToken, AuthError> {
        Ok(generate_access_token(
            user_id,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?)
    }

    /// Revoke a session (logout)
    pub async fn revoke_session(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AuthError> {
        if !self
            .store
            .remove_session(user_id, &hash_token(refresh_token))
            .await?
        {
            return Err(AuthError::SessionNotFound);
        }

        tracing::info!(user_id = %user_id, "Session revoked");

        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Delete a user along with every session and document they own
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        if !self.store.delete_user(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted");

        Ok(())
    }

    /// Remove expired sessions from every user
    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        Ok(self.store.purge_expired_sessions(Utc::now()).await?)
    }

    /// Get JWT secret (for middleware access)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
