//! Router assembly
//!
//! Shared by the binary and the integration tests so both exercise the same
//! middleware stack.

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::handlers::health_check;
use crate::middleware::{
    headers::{X_ACCESS_TOKEN, X_REFRESH_TOKEN, X_USER_ID},
    request_tracing, with_security_headers, RateLimiter,
};
use crate::routes;
use crate::state::AppState;

/// Build the application router
pub fn build_router(app_state: AppState, config: &Config, limiter: RateLimiter) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(routes::user_routes(limiter))
        .merge(routes::list_routes())
        .with_state(app_state);

    with_security_headers(router, config.environment.is_production())
        .layer(request_tracing())
        .layer(configure_cors(config.cors_allowed_origins.as_deref()))
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let exposed = [X_ACCESS_TOKEN.clone(), X_REFRESH_TOKEN.clone()];

    let origins: Vec<HeaderValue> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive().expose_headers(exposed);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            X_ACCESS_TOKEN.clone(),
            X_REFRESH_TOKEN.clone(),
            X_USER_ID.clone(),
        ])
        .expose_headers(exposed)
}
