//! Application state shared by every handler.

use std::sync::Arc;

use crate::repository::AdminRepository;
use crate::service::{AdminManager, AdminService, AuthService, Authenticator};
use common::JwtConfig;

/// Services injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub admin_service: Arc<dyn AdminService>,
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    /// Wire both services over the same repository.
    pub fn from_repository(repo: Arc<dyn AdminRepository>, jwt: JwtConfig) -> Self {
        Self {
            admin_service: Arc::new(AdminManager::new(repo.clone())),
            auth_service: Arc::new(Authenticator::new(repo, jwt)),
        }
    }

    pub fn new(admin_service: Arc<dyn AdminService>, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            admin_service,
            auth_service,
        }
    }
}
