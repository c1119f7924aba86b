//! Service layer - business use cases.

mod admin_service;
mod auth_service;

pub use admin_service::{
    AdminManager, AdminService, CreateAdmin, UpdateAdmin, ADMIN_DELETED, ADMIN_EXISTS,
    EMAIL_TAKEN, NON_ADMIN_EXISTS, SUPER_ADMIN_EXISTS,
};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
