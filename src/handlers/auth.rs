//! Authentication HTTP handlers
//!
//! Signup, login, access-token refresh and session management.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;

use super::{AuthenticatedUser, SessionUser};
use crate::auth::AuthenticatedSession;
use crate::error::ApiError;
use crate::middleware::headers::{AccessToken, RefreshToken};
use crate::models::{AccessTokenResponse, CredentialsRequest, UserResponse};
use crate::state::AppState;

/// Response carrying a fresh token pair in headers and the user in the body
type SessionResponse = (
    TypedHeader<AccessToken>,
    TypedHeader<RefreshToken>,
    Json<UserResponse>,
);

fn session_response(session: AuthenticatedSession) -> SessionResponse {
    (
        TypedHeader(AccessToken(session.access_token.token)),
        TypedHeader(RefreshToken(session.refresh_token)),
        Json(session.user.into()),
    )
}

/// POST /users - Sign up and open a session
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<SessionResponse, ApiError> {
    let Json(req) = body?;
    let session = state.auth_service.signup(req).await?;

    Ok(session_response(session))
}

/// POST /users/login - Check credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<SessionResponse, ApiError> {
    let Json(req) = body?;
    let session = state.auth_service.login(req).await?;

    Ok(session_response(session))
}

/// GET /users/me/access-token - Mint a new access token from a valid session
pub async fn get_access_token(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<(TypedHeader<AccessToken>, Json<AccessTokenResponse>), ApiError> {
    let issued = state.auth_service.issue_access_token(session.user.id)?;

    tracing::debug!(user_id = %session.user.id, "Access token refreshed");

    Ok((
        TypedHeader(AccessToken(issued.token.clone())),
        Json(AccessTokenResponse {
            access_token: issued.token,
        }),
    ))
}

/// DELETE /users/me/session - Revoke the presented session (logout)
pub async fn logout(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service
        .revoke_session(session.user.id, &session.refresh_token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/me - Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_user_by_id(user.user_id).await?;

    Ok(Json(user.into()))
}

/// DELETE /users/me - Delete the account with all its sessions, lists and tasks
pub async fn delete_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.auth_service.delete_user(user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
