//! Data models for Listkeeper backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::HashedPassword;

pub mod auth;
pub use auth::*;

/// User model
///
/// `password_hash` and `sessions` never leave the server: responses go
/// through [`UserResponse`].
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub sessions: Vec<Session>,
}

impl User {
    /// Session whose stored digest equals `token_hash`
    pub fn session_by_hash(&self, token_hash: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.token_hash == token_hash)
    }
}

/// A user about to be inserted. The password can only be a hash here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: HashedPassword,
}

/// One issued refresh token
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Todo list owned by a single user
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct List {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
}

/// Task belonging to a list
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub list_id: Uuid,
    pub completed: bool,
}

/// Partial task update; `None` fields are left untouched
#[derive(Debug, Default, Clone)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Simple acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
