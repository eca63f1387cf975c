//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::db::Store;
use crate::lists::ListService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub list_service: Arc<ListService>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        list_service: Arc<ListService>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            auth_service,
            list_service,
            store,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ListService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.list_service.clone()
    }
}
