use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::Store;
use crate::error::ApiError;
use crate::lists::model::{CreateTaskRequest, List, ListRequest, Task, UpdateTaskRequest};

/// List and task operations on behalf of an authenticated user.
///
/// Every call takes the caller's id; documents owned by anyone else are
/// reported as not found.
#[derive(Clone)]
pub struct ListService {
    store: Arc<dyn Store>,
}

fn list_not_found() -> ApiError {
    ApiError::NotFound("List not found".to_string())
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

impl ListService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_lists(&self, owner_id: Uuid) -> Result<Vec<List>, ApiError> {
        Ok(self.store.find_lists(owner_id).await?)
    }

    pub async fn create_list(
        &self,
        owner_id: Uuid,
        request: ListRequest,
    ) -> Result<List, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let list = self.store.insert_list(owner_id, &request.title).await?;
        tracing::info!(list_id = %list.id, owner_id = %owner_id, "List created");

        Ok(list)
    }

    pub async fn update_list(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        request: ListRequest,
    ) -> Result<List, ApiError> {
        let request = request.normalized();
        request.validate()?;

        self.store
            .update_list(owner_id, list_id, &request.title)
            .await?
            .ok_or_else(list_not_found)
    }

    /// Delete a list; its tasks go with it
    pub async fn delete_list(&self, owner_id: Uuid, list_id: Uuid) -> Result<List, ApiError> {
        let list = self
            .store
            .delete_list(owner_id, list_id)
            .await?
            .ok_or_else(list_not_found)?;

        tracing::info!(list_id = %list.id, owner_id = %owner_id, "List deleted");

        Ok(list)
    }

    pub async fn get_tasks(&self, owner_id: Uuid, list_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.store
            .find_tasks(owner_id, list_id)
            .await?
            .ok_or_else(list_not_found)
    }

    pub async fn get_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, ApiError> {
        self.store
            .find_task(owner_id, list_id, task_id)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn create_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        request: CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        let request = request.normalized();
        request.validate()?;

        self.store
            .insert_task(owner_id, list_id, &request.title)
            .await?
            .ok_or_else(list_not_found)
    }

    pub async fn update_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
        request: UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        let request = request.normalized();
        if request.is_empty() {
            return Err(ApiError::ValidationError(
                "Nothing to update: provide title or completed".to_string(),
            ));
        }
        request.validate()?;

        self.store
            .update_task(owner_id, list_id, task_id, request.into())
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn delete_task(
        &self,
        owner_id: Uuid,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, ApiError> {
        self.store
            .delete_task(owner_id, list_id, task_id)
            .await?
            .ok_or_else(task_not_found)
    }
}
