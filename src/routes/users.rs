//! User and session routes

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::auth;
use crate::middleware::{rate_limit, RateLimiter};
use crate::state::AppState;

/// Create user routes
///
/// Signup and login sit behind `limiter`; the token routes do not hash
/// passwords and are left unthrottled.
pub fn user_routes(limiter: RateLimiter) -> Router<AppState> {
    let credentials = Router::new()
        .route("/users", post(auth::signup))
        .route("/users/login", post(auth::login))
        .route_layer(from_fn_with_state(limiter, rate_limit));

    Router::new()
        .route(
            "/users/me",
            get(auth::get_current_user).delete(auth::delete_current_user),
        )
        .route("/users/me/access-token", get(auth::get_access_token))
        .route("/users/me/session", axum::routing::delete(auth::logout))
        .merge(credentials)
}
