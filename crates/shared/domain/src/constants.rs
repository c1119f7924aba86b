//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Admin Roles
// =============================================================================

/// University administrator
pub const ROLE_ADMIN: &str = "admin";

/// Platform-wide administrator
pub const ROLE_SUPER_ADMIN: &str = "super-admin";

/// Roles accepted by the admin management endpoints
pub const ADMIN_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// Check if a role value is one of the admin roles
pub fn is_valid_role(role: &str) -> bool {
    ADMIN_ROLES.contains(&role)
}

// =============================================================================
// Memberships
// =============================================================================

/// Placeholder shown when an admin has no affiliation to report
pub const UNIVERSITY_UNKNOWN: &str = "N/A";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: u64 = 1;

/// Record ids are 12 bytes rendered as lowercase hex
pub const RECORD_ID_LENGTH: usize = 24;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted token lifetime (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Authorization header prefix
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Listing
// =============================================================================

/// Default number of admins returned per page
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Upper bound on a single page
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Pages are 1-indexed
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
