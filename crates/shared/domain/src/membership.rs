//! Per-university admin memberships.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::record_id::RecordId;

/// Status of an admin at one university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum MembershipStatus {
    Active,
    Inactive,
    Pending,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::Inactive => "Inactive",
            MembershipStatus::Pending => "Pending",
        }
    }

    /// Status reported for an account without a membership.
    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active {
            MembershipStatus::Active
        } else {
            MembershipStatus::Inactive
        }
    }
}

impl Default for MembershipStatus {
    fn default() -> Self {
        MembershipStatus::Active
    }
}

impl FromStr for MembershipStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(MembershipStatus::Active),
            "Inactive" => Ok(MembershipStatus::Inactive),
            "Pending" => Ok(MembershipStatus::Pending),
            other => Err(DomainError::validation(format!(
                "Unknown membership status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An admin's affiliation with a single university.
///
/// Memberships reference their account by email value. `(email, university)`
/// is unique across all memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Copy of the account role at the time of the last sync.
    pub role: String,
    pub university: String,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
