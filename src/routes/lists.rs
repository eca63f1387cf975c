//! List and task routes

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::lists;
use crate::state::AppState;

pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/lists", get(lists::get_lists).post(lists::create_list))
        .route(
            "/lists/:list_id",
            patch(lists::update_list).delete(lists::delete_list),
        )
        .route(
            "/lists/:list_id/tasks",
            get(lists::get_tasks).post(lists::create_task),
        )
        .route(
            "/lists/:list_id/tasks/:task_id",
            get(lists::get_task)
                .patch(lists::update_task)
                .delete(lists::delete_task),
        )
}
