//! Listkeeper Backend Library
//!
//! Accounts with refresh-token sessions and short-lived access tokens, plus
//! per-user lists and tasks.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lists;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
