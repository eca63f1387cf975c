//! API handlers for Listkeeper

pub mod auth;
pub mod health;
pub mod lists;

pub use health::health_check;

// Guards are re-exported so handlers can name them locally
pub use crate::middleware::auth::{AuthenticatedUser, SessionUser};
