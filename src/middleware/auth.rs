//! Authentication guards
//!
//! Two independent extractors, composable per route:
//! - [`AuthenticatedUser`] requires a valid access token
//! - [`SessionUser`] requires a valid, unexpired refresh-token session
//!
//! A handler taking either one as an argument never runs when the guard
//! rejects the request.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use std::sync::Arc;
use uuid::Uuid;

use super::headers::{AccessToken, RefreshToken, UserId};
use crate::auth::{has_expired, verify_access_token, AuthError, AuthService};
use crate::error::ApiError;
use crate::models::{Session, User};

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

/// Identity resolved from an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Extractor for authenticated users
///
/// Verifies the `x-access-token` header locally; the store is not consulted.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(AccessToken(token)) =
            TypedHeader::<AccessToken>::from_request_parts(parts, state)
                .await
                .map_err(|_| unauthorized("x-access-token header required"))?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let user_id = verify_access_token(&token, auth_service.jwt_secret()).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            unauthorized("Invalid or expired access token")
        })?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Identity resolved from a refresh token session
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub session: Session,
    pub refresh_token: String,
}

/// Extractor for requests carrying a refresh token
///
/// Reads `x-refresh-token` and `_id`, requires the user to hold a matching
/// session, and rejects sessions past their expiry.
#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(RefreshToken(refresh_token)) =
            TypedHeader::<RefreshToken>::from_request_parts(parts, state)
                .await
                .map_err(|_| unauthorized("x-refresh-token header required"))?;

        let TypedHeader(UserId(user_id)) = TypedHeader::<UserId>::from_request_parts(parts, state)
            .await
            .map_err(|_| unauthorized("_id header required"))?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let found = auth_service
            .find_by_id_and_token(user_id, &refresh_token)
            .await
            .map_err(|e| ApiError::from(e).into_response())?;

        let Some((user, session)) = found else {
            tracing::warn!(user_id = %user_id, "Refresh token does not match any session");
            return Err(ApiError::from(AuthError::SessionNotFound).into_response());
        };

        if has_expired(session.expires_at) {
            tracing::warn!(user_id = %user_id, session_id = %session.id, "Refresh token session expired");
            return Err(ApiError::from(AuthError::SessionExpired).into_response());
        }

        Ok(SessionUser {
            user,
            session,
            refresh_token,
        })
    }
}
