//! PostgreSQL-backed store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{List, NewUser, Session, Task, TaskChanges, User};

/// Store implementation on top of a sqlx connection pool
#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    async fn load_sessions(&self, user: Option<User>) -> Result<Option<User>, StoreError> {
        let Some(mut user) = user else {
            return Ok(None);
        };

        user.sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Some(user))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(user.password.as_str())
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        self.load_sessions(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        self.load_sessions(user).await
    }

    async fn push_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        // Single statement: the append either lands or the user is gone.
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            SELECT $1, u.id, $3, $4, $5
            FROM users u
            WHERE u.id = $2
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(session)
    }

    async fn remove_session(&self, user_id: Uuid, token_hash: &str) -> Result<bool, StoreError> {
        let rows_affected =
            sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token_hash = $2")
                .bind(user_id)
                .bind(token_hash)
                .execute(&self.db_pool)
                .await?
                .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let rows_affected = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        // sessions, lists and tasks go with it through ON DELETE CASCADE
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn find_lists(&self, owner_id: Uuid) -> Result<Vec<List>, StoreError> {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT id, title, owner_id
            FROM lists
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(lists)
    }

    async fn find_list(&self, owner_id: Uuid, list_id: Uuid) -> Result<Option<List>, StoreError> {
        let list = sqlx::query_as::<_, List>(
            "SELECT id, title, owner_id FROM lists WHERE id = $1 AND owner_id = $2",
        )
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(list)
    }

    async fn insert_list(&self, owner_id: Uuid, title: &str) -> Result<List, StoreError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (id, title, owner_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, owner_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(list)
    }

    async fn update_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<List>, StoreError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            UPDATE lists
            SET title = $3
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, owner_id
            "#,
        )
        .bind(list_id)
        .bind(owner_id)
        .bind(title)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(list)
    }

    async fn delete_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<List>, StoreError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            DELETE FROM lists
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, owner_id
            "#,
        )
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(list)
    }

    async fn find_tasks(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<Vec<Task>>, StoreError> {
        if self.find_list(owner_id, list_id).await?.is_none() {
            return Ok(None);
        }

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, list_id, completed
            FROM tasks
            WHERE list_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Some(tasks))
    }

    async fn find_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.list_id, t.completed
            FROM tasks t
            JOIN lists l ON l.id = t.list_id
            WHERE t.id = $1 AND t.list_id = $2 AND l.owner_id = $3
            "#,
        )
        .bind(task_id)
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(task)
    }

    async fn insert_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, title, list_id, completed, created_at)
            SELECT $1, $2, l.id, FALSE, $5
            FROM lists l
            WHERE l.id = $3 AND l.owner_id = $4
            RETURNING id, title, list_id, completed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(list_id)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(task)
    }

    async fn update_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET title = COALESCE($4, t.title),
                completed = COALESCE($5, t.completed)
            FROM lists l
            WHERE t.id = $1 AND t.list_id = $2 AND l.id = t.list_id AND l.owner_id = $3
            RETURNING t.id, t.title, t.list_id, t.completed
            "#,
        )
        .bind(task_id)
        .bind(list_id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.completed)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks t
            USING lists l
            WHERE t.id = $1 AND t.list_id = $2 AND l.id = t.list_id AND l.owner_id = $3
            RETURNING t.id, t.title, t.list_id, t.completed
            "#,
        )
        .bind(task_id)
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(task)
    }
}
