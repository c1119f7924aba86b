//! Admin account entity and role enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};
use crate::membership::MembershipStatus;
use crate::password::Password;
use crate::record_id::RecordId;

/// Canonical form used for every stored and compared email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account role.
///
/// Legacy records may carry roles outside the admin set; those are kept
/// verbatim so they can be reported back without being rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
    Other(String),
}

impl AdminRole {
    /// Check if this role may use the admin back-office
    pub fn is_admin(&self) -> bool {
        matches!(self, AdminRole::Admin | AdminRole::SuperAdmin)
    }

    /// Check if this role may manage other admins
    pub fn is_super_admin(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AdminRole::Admin => ROLE_ADMIN,
            AdminRole::SuperAdmin => ROLE_SUPER_ADMIN,
            AdminRole::Other(role) => role,
        }
    }
}

impl From<&str> for AdminRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => AdminRole::Admin,
            ROLE_SUPER_ADMIN => AdminRole::SuperAdmin,
            other => AdminRole::Other(other.to_string()),
        }
    }
}

impl From<String> for AdminRole {
    fn from(s: String) -> Self {
        AdminRole::from(s.as_str())
    }
}

impl From<AdminRole> for String {
    fn from(role: AdminRole) -> Self {
        match role {
            AdminRole::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global admin identity: credentials, primary role and active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub id: RecordId,
    pub name: String,
    /// Unique across accounts, stored lowercase.
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    /// Home university recorded at creation.
    pub university: Option<String>,
    pub is_active: bool,
    pub require_password_change: bool,
    pub failed_login_attempts: i32,
    pub last_password_change: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminAccount {
    /// Stored password wrapped for verification
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.as_str())
    }

    /// Status reported when no membership is in scope
    pub fn fallback_status(&self) -> MembershipStatus {
        MembershipStatus::from_active_flag(self.is_active)
    }

    pub fn is_home_university(&self, university: &str) -> bool {
        self.university.as_deref() == Some(university)
    }
}
