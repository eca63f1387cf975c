//! Route definitions for Listkeeper API

mod lists;
mod users;

pub use lists::list_routes;
pub use users::user_routes;
