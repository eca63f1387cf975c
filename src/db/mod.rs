//! Persistence layer for Listkeeper
//!
//! The rest of the crate talks to a [`Store`], a key-addressable document
//! store with find/insert/update/delete primitives. Every mutation is a
//! single conditional operation that reports whether a record matched, so
//! callers never need a read-modify-write cycle.
//!
//! Two implementations exist:
//! - [`PgStore`]: PostgreSQL through sqlx, used in deployments
//! - [`MemoryStore`]: in-process maps, used by tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{List, NewUser, Session, Task, TaskChanges, User};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store-level failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEmail;
            }
        }
        StoreError::Database(e.to_string())
    }
}

/// Persistent store for users, sessions, lists and tasks.
///
/// List and task operations are always scoped by the owning user: a record
/// owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync {
    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a user; fails with [`StoreError::DuplicateEmail`] if the email is taken
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Find a user by id, sessions included
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Find a user by normalized email, sessions included
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Atomically append a session to a user's session list.
    ///
    /// Returns `None` if the user does not exist.
    async fn push_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError>;

    /// Drop the session with the given token digest. Returns whether one matched.
    async fn remove_session(&self, user_id: Uuid, token_hash: &str) -> Result<bool, StoreError>;

    /// Remove every session that expired at or before `now`
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Delete a user together with their sessions, lists and tasks
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn find_lists(&self, owner_id: Uuid) -> Result<Vec<List>, StoreError>;

    async fn find_list(&self, owner_id: Uuid, list_id: Uuid) -> Result<Option<List>, StoreError>;

    async fn insert_list(&self, owner_id: Uuid, title: &str) -> Result<List, StoreError>;

    async fn update_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<List>, StoreError>;

    /// Delete a list and all of its tasks
    async fn delete_list(&self, owner_id: Uuid, list_id: Uuid)
        -> Result<Option<List>, StoreError>;

    /// Tasks of a list, or `None` if the list is not owned by `owner_id`
    async fn find_tasks(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<Vec<Task>>, StoreError>;

    async fn find_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError>;

    /// Insert a task; `None` if the list is not owned by `owner_id`
    async fn insert_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<Task>, StoreError>;

    async fn update_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError>;
}

/// Database connection error
#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not configured")]
    NotConfigured,

    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    #[error("Failed to run migrations: {0}")]
    MigrationError(String),
}

/// Create a database connection pool
pub async fn create_pool(config: &Config) -> Result<PgPool, DbError> {
    let database_url = config.database_url.as_deref().ok_or(DbError::NotConfigured)?;

    tracing::info!("Connecting to database at {}", config.database_url_masked());

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .map_err(|e| DbError::ConnectionError(e.to_string()))?;

    tracing::info!("Database connection pool created successfully");

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}
