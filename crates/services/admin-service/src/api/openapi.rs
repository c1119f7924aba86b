//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler};
use crate::service::TokenResponse;
use crate::types::{DeletedAdmin, MessageResponse};
use domain::{AdminView, CreatedAdmin, MembershipStatus};

/// OpenAPI documentation for the admin service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Admin Service",
        version = "0.1.0",
        description = "Super-admin management of university admin accounts and memberships"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::change_password,
        admin_handler::list_admins,
        admin_handler::create_admin,
        admin_handler::get_admin,
        admin_handler::update_admin,
        admin_handler::delete_admin,
    ),
    components(
        schemas(
            MembershipStatus,
            AdminView,
            CreatedAdmin,
            DeletedAdmin,
            MessageResponse,
            TokenResponse,
            auth_handler::LoginRequest,
            auth_handler::ChangePasswordRequest,
            admin_handler::CreateAdminRequest,
            admin_handler::UpdateAdminRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Admin login and password management"),
        (name = "Admins", description = "Super-admin management of university admins")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
