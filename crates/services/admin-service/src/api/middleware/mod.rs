//! Request middleware.

mod auth;

pub use auth::{auth_middleware, require_super_admin, CurrentAdmin};
