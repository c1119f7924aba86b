//! Client-facing admin representations. None of them carry a password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::membership::MembershipStatus;

/// Account merged with the membership in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    /// Account id
    pub id: String,
    /// Membership name, else account name
    pub name: String,
    pub email: String,
    pub role: String,
    /// Membership university, else the requested one, else "N/A"
    pub university: String,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub require_password_change: bool,
}

/// Response to a successful admin creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreatedAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub university: String,
    pub status: MembershipStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
