//! List and task HTTP handlers
//!
//! All routes sit behind the access guard and operate on the caller's own
//! documents only.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use uuid::Uuid;

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::lists::{CreateTaskRequest, List, ListRequest, Task, UpdateTaskRequest};
use crate::models::MessageResponse;
use crate::state::AppState;

/// GET /lists
pub async fn get_lists(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<List>>, ApiError> {
    let lists = state.list_service.get_lists(user.user_id).await?;

    Ok(Json(lists))
}

/// POST /lists
pub async fn create_list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<ListRequest>, JsonRejection>,
) -> Result<Json<List>, ApiError> {
    let Json(req) = body?;
    let list = state.list_service.create_list(user.user_id, req).await?;

    Ok(Json(list))
}

/// PATCH /lists/:list_id
pub async fn update_list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ListRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(list_id) = path?;
    let Json(req) = body?;
    state
        .list_service
        .update_list(user.user_id, list_id, req)
        .await?;

    Ok(Json(MessageResponse::new("Updated successfully")))
}

/// DELETE /lists/:list_id
pub async fn delete_list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<List>, ApiError> {
    let Path(list_id) = path?;
    let list = state.list_service.delete_list(user.user_id, list_id).await?;

    Ok(Json(list))
}

/// GET /lists/:list_id/tasks
pub async fn get_tasks(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Path(list_id) = path?;
    let tasks = state.list_service.get_tasks(user.user_id, list_id).await?;

    Ok(Json(tasks))
}

/// GET /lists/:list_id/tasks/:task_id
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path((list_id, task_id)) = path?;
    let task = state
        .list_service
        .get_task(user.user_id, list_id, task_id)
        .await?;

    Ok(Json(task))
}

/// POST /lists/:list_id/tasks
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(list_id) = path?;
    let Json(req) = body?;
    let task = state
        .list_service
        .create_task(user.user_id, list_id, req)
        .await?;

    Ok(Json(task))
}

/// PATCH /lists/:list_id/tasks/:task_id
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path((list_id, task_id)) = path?;
    let Json(req) = body?;
    state
        .list_service
        .update_task(user.user_id, list_id, task_id, req)
        .await?;

    Ok(Json(MessageResponse::new("Updated successfully")))
}

/// DELETE /lists/:list_id/tasks/:task_id
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path((list_id, task_id)) = path?;
    let task = state
        .list_service
        .delete_task(user.user_id, list_id, task_id)
        .await?;

    Ok(Json(task))
}
