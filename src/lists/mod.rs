//! Lists and tasks owned by users

pub mod model;
mod service;

pub use model::*;
pub use service::ListService;
