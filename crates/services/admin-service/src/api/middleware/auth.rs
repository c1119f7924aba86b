//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use common::AppError;
use domain::{AdminRole, BEARER_TOKEN_PREFIX};

/// Admin identified by the bearer token
#[derive(Clone, Debug)]
pub struct CurrentAdmin {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
}

/// Validates the bearer token and injects [`CurrentAdmin`] into the request
/// extensions. Missing or invalid tokens are rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_admin = CurrentAdmin {
        id: claims.sub,
        email: claims.email,
        role: AdminRole::from(claims.role),
    };

    request.extensions_mut().insert(current_admin);

    Ok(next.run(request).await)
}

/// Require the super-admin role, returns Forbidden otherwise.
pub fn require_super_admin(admin: &CurrentAdmin) -> Result<(), AppError> {
    if admin.role.is_super_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
