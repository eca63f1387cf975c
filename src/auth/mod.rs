//! Authentication module for Listkeeper
//!
//! Provides email/password authentication with two kinds of tokens:
//! - Short-lived JWT access tokens, verified without touching the store
//! - Opaque refresh tokens backed by per-user sessions in the store

mod jwt;
mod password;
mod service;
mod session;
mod sweeper;

pub use jwt::{
    generate_access_token, get_user_id_from_claims, verify_access_token, verify_token, Claims,
    IssuedToken, JwtError,
};
pub use password::{
    hash_password, verify_password, HashedPassword, Password, PasswordError, MAX_PASSWORD_BYTES,
};
pub use service::{AuthError, AuthService, AuthenticatedSession};
pub use session::{generate_refresh_token, has_expired, hash_token};
pub use sweeper::session_sweeper;
