//! Middleware for Listkeeper API
//!
//! This module provides the authentication guards, token headers, request
//! tracing, security headers and rate limiting.

pub mod auth;
pub mod headers;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{AuthenticatedUser, SessionUser};
pub use rate_limiter::{client_ip, rate_limit, RateLimiter};
pub use security::with_security_headers;
pub use tracing::request_tracing;
