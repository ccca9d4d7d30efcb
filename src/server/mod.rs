mod admin;
mod catalog;
pub mod dto;
pub mod response;
mod router;
pub mod user;
pub mod validation;

pub use admin::admin_router;
pub use catalog::catalog_router;
pub use router::{AppState, create_router};
pub use user::user_router;
