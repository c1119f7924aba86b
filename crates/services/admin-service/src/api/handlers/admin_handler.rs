//! Super-admin management of university admins.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{is_valid_role, AdminView, CreatedAdmin, MembershipStatus};

use crate::api::extractors::{field_error, ValidatedJson};
use crate::api::middleware::{require_super_admin, CurrentAdmin};
use crate::api::AppState;
use crate::service::{CreateAdmin, UpdateAdmin};
use crate::types::{DeletedAdmin, PageParams};

const STATUS_CHOICES: &str = "Status must be one of Active, Inactive, Pending";
const ROLE_CHOICES: &str = "Role must be admin or super-admin";

/// Admin creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Abebe Kebede")]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "abebe@wldu.edu.et")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "Initial#2024", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "University is required"))]
    #[schema(example = "Woldia University")]
    pub university: String,
    /// Active, Inactive or Pending (defaults to Active)
    #[schema(example = "Active")]
    pub status: Option<String>,
}

/// Partial admin update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    /// University whose membership is created or updated
    #[validate(length(min = 1, message = "University cannot be empty"))]
    #[schema(example = "Woldia University")]
    pub university: Option<String>,
    #[schema(example = "Pending")]
    pub status: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
}

/// Query string for the list endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAdminsQuery {
    /// University to list admins for
    pub university: Option<String>,
    /// Page size (default 500, max 1000)
    pub limit: Option<u64>,
    /// 1-based page number
    pub page: Option<u64>,
}

/// Query string for the read endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetAdminQuery {
    /// Scope the view to this university's membership
    pub university: Option<String>,
}

fn parse_status(status: Option<String>) -> AppResult<Option<MembershipStatus>> {
    status
        .map(|s| s.parse().map_err(|_| field_error("status", STATUS_CHOICES)))
        .transpose()
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/super/admins", get(list_admins).post(create_admin))
        .route(
            "/api/super/admins/:id",
            get(get_admin).patch(update_admin).delete(delete_admin),
        )
}

/// List admins of a university
#[utoipa::path(
    get,
    path = "/api/super/admins",
    tag = "Admins",
    security(("bearer_auth" = [])),
    params(ListAdminsQuery),
    responses(
        (status = 200, description = "Admins tied to the university, newest first", body = Vec<AdminView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super-admin only")
    )
)]
pub async fn list_admins(
    Extension(current_admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    Query(query): Query<ListAdminsQuery>,
) -> AppResult<Json<Vec<AdminView>>> {
    require_super_admin(&current_admin)?;

    let page = PageParams {
        limit: query.limit,
        page: query.page,
    };
    let admins = state
        .admin_service
        .list_admins(query.university, page)
        .await?;

    Ok(Json(admins))
}

/// Create a university admin
#[utoipa::path(
    post,
    path = "/api/super/admins",
    tag = "Admins",
    security(("bearer_auth" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = CreatedAdmin),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super-admin only"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_admin(
    Extension(current_admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<CreatedAdmin>)> {
    require_super_admin(&current_admin)?;

    let input = CreateAdmin {
        status: parse_status(payload.status)?,
        name: payload.name,
        email: payload.email,
        password: payload.password,
        university: payload.university,
    };
    let created = state.admin_service.create_admin(input).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get one admin, merged with a membership
#[utoipa::path(
    get,
    path = "/api/super/admins/{id}",
    tag = "Admins",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Admin ID (24 hex characters)"),
        GetAdminQuery
    ),
    responses(
        (status = 200, description = "Admin", body = AdminView),
        (status = 400, description = "Invalid admin ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super-admin only"),
        (status = 404, description = "Admin not found")
    )
)]
pub async fn get_admin(
    Extension(current_admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GetAdminQuery>,
) -> AppResult<Json<AdminView>> {
    require_super_admin(&current_admin)?;
    let admin = state.admin_service.get_admin(&id, query.university).await?;
    Ok(Json(admin))
}

/// Update an admin and reconcile memberships
#[utoipa::path(
    patch,
    path = "/api/super/admins/{id}",
    tag = "Admins",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Admin ID (24 hex characters)")
    ),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Updated admin", body = AdminView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super-admin only"),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_admin(
    Extension(current_admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateAdminRequest>,
) -> AppResult<Json<AdminView>> {
    require_super_admin(&current_admin)?;

    if let Some(role) = payload.role.as_deref() {
        if !is_valid_role(role) {
            return Err(field_error("role", ROLE_CHOICES));
        }
    }

    let update = UpdateAdmin {
        status: parse_status(payload.status)?,
        name: payload.name,
        email: payload.email,
        password: payload.password,
        university: payload.university,
        role: payload.role,
    };
    let admin = state.admin_service.update_admin(&id, update).await?;

    Ok(Json(admin))
}

/// Delete an admin and every membership
#[utoipa::path(
    delete,
    path = "/api/super/admins/{id}",
    tag = "Admins",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Admin ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Admin deleted", body = DeletedAdmin),
        (status = 400, description = "Invalid admin ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super-admin only"),
        (status = 404, description = "Admin not found")
    )
)]
pub async fn delete_admin(
    Extension(current_admin): Extension<CurrentAdmin>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedAdmin>> {
    require_super_admin(&current_admin)?;
    let deleted = state.admin_service.delete_admin(&id).await?;
    Ok(Json(deleted))
}
