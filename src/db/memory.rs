//! In-memory store
//!
//! Each operation runs under one lock acquisition, which gives the same
//! atomicity as the single-statement queries of the PostgreSQL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{List, NewUser, Session, Task, TaskChanges, User};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    // Vec keeps insertion order, matching ORDER BY created_at in PgStore
    lists: Vec<List>,
    tasks: Vec<Task>,
}

impl Collections {
    fn owns_list(&self, owner_id: Uuid, list_id: Uuid) -> bool {
        self.lists
            .iter()
            .any(|l| l.id == list_id && l.owner_id == owner_id)
    }

    fn task_position(&self, owner_id: Uuid, list_id: Uuid, task_id: Uuid) -> Option<usize> {
        if !self.owns_list(owner_id, list_id) {
            return None;
        }
        self.tasks
            .iter()
            .position(|t| t.id == task_id && t.list_id == list_id)
    }
}

/// Store kept entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut collections = self.collections.write().await;

        if collections.emails.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password.as_str().to_string(),
            created_at: Utc::now(),
            sessions: Vec::new(),
        };

        collections.emails.insert(record.email.clone(), record.id);
        collections.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.collections.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .emails
            .get(email)
            .and_then(|id| collections.users.get(id))
            .cloned())
    }

    async fn push_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(user) = collections.users.get_mut(&user_id) else {
            return Ok(None);
        };

        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        user.sessions.push(session.clone());

        Ok(Some(session))
    }

    async fn remove_session(&self, user_id: Uuid, token_hash: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(user) = collections.users.get_mut(&user_id) else {
            return Ok(false);
        };

        let before = user.sessions.len();
        user.sessions.retain(|s| s.token_hash != token_hash);

        Ok(user.sessions.len() < before)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;

        let mut removed = 0u64;
        for user in collections.users.values_mut() {
            let before = user.sessions.len();
            user.sessions.retain(|s| s.expires_at > now);
            removed += (before - user.sessions.len()) as u64;
        }

        Ok(removed)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(user) = collections.users.remove(&id) else {
            return Ok(false);
        };
        collections.emails.remove(&user.email);

        let owned: Vec<Uuid> = collections
            .lists
            .iter()
            .filter(|l| l.owner_id == id)
            .map(|l| l.id)
            .collect();
        collections.lists.retain(|l| l.owner_id != id);
        collections.tasks.retain(|t| !owned.contains(&t.list_id));

        Ok(true)
    }

    async fn find_lists(&self, owner_id: Uuid) -> Result<Vec<List>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .lists
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_list(&self, owner_id: Uuid, list_id: Uuid) -> Result<Option<List>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .lists
            .iter()
            .find(|l| l.id == list_id && l.owner_id == owner_id)
            .cloned())
    }

    async fn insert_list(&self, owner_id: Uuid, title: &str) -> Result<List, StoreError> {
        let list = List {
            id: Uuid::new_v4(),
            title: title.to_string(),
            owner_id,
        };
        self.collections.write().await.lists.push(list.clone());
        Ok(list)
    }

    async fn update_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<List>, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .lists
            .iter_mut()
            .find(|l| l.id == list_id && l.owner_id == owner_id)
            .map(|l| {
                l.title = title.to_string();
                l.clone()
            }))
    }

    async fn delete_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<List>, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(pos) = collections
            .lists
            .iter()
            .position(|l| l.id == list_id && l.owner_id == owner_id)
        else {
            return Ok(None);
        };

        let list = collections.lists.remove(pos);
        collections.tasks.retain(|t| t.list_id != list_id);

        Ok(Some(list))
    }

    async fn find_tasks(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<Vec<Task>>, StoreError> {
        let collections = self.collections.read().await;

        if !collections.owns_list(owner_id, list_id) {
            return Ok(None);
        }

        Ok(Some(
            collections
                .tasks
                .iter()
                .filter(|t| t.list_id == list_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .task_position(owner_id, list_id, task_id)
            .map(|pos| collections.tasks[pos].clone()))
    }

    async fn insert_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<Task>, StoreError> {
        let mut collections = self.collections.write().await;

        if !collections.owns_list(owner_id, list_id) {
            return Ok(None);
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            list_id,
            completed: false,
        };
        collections.tasks.push(task.clone());

        Ok(Some(task))
    }

    async fn update_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(pos) = collections.task_position(owner_id, list_id, task_id) else {
            return Ok(None);
        };

        let task = &mut collections.tasks[pos];
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }

        Ok(Some(task.clone()))
    }

    async fn delete_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let mut collections = self.collections.write().await;

        let Some(pos) = collections.task_position(owner_id, list_id, task_id) else {
            return Ok(None);
        };

        Ok(Some(collections.tasks.remove(pos)))
    }
}
