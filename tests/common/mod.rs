//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use listkeeper_server::app::build_router;
use listkeeper_server::auth::AuthService;
use listkeeper_server::config::{Config, Environment};
use listkeeper_server::db::{MemoryStore, Store};
use listkeeper_server::lists::ListService;
use listkeeper_server::middleware::RateLimiter;
use listkeeper_server::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        environment: Environment::Development,
        port: 0,
        db_max_connections: 1,
        rate_limit_rps: 1000,
        cors_allowed_origins: None,
        log_level: "debug".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        access_token_ttl_seconds: 900,
        refresh_token_ttl_days: 10,
        bcrypt_cost: 4,
        session_sweep_interval_seconds: 0,
    }
}

/// Router over a fresh in-memory store
pub fn test_app() -> Router {
    test_app_with(test_config())
}

pub fn test_app_with(config: Config) -> Router {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        config.jwt_secret.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_days,
        config.bcrypt_cost,
    ));
    let list_service = Arc::new(ListService::new(store.clone()));
    let limiter = RateLimiter::new(config.rate_limit_rps);

    build_router(AppState::new(auth_service, list_service, store), &config, limiter)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Send one request; `headers` are (name, value) pairs
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Tokens and id of a freshly signed-up user
pub struct Account {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Account {
    pub fn access(&self) -> [(&str, &str); 1] {
        [("x-access-token", self.access_token.as_str())]
    }

    pub fn session(&self) -> [(&str, &str); 2] {
        [
            ("x-refresh-token", self.refresh_token.as_str()),
            ("_id", self.id.as_str()),
        ]
    }
}

pub async fn signup(app: &Router, email: &str) -> Account {
    let res = send(
        app,
        Method::POST,
        "/users",
        &[],
        Some(serde_json::json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "signup failed: {}", res.body);

    Account {
        id: res.body["id"].as_str().unwrap().to_string(),
        access_token: res.header("x-access-token").unwrap(),
        refresh_token: res.header("x-refresh-token").unwrap(),
    }
}
