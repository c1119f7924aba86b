//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod admin;
pub mod constants;
pub mod error;
pub mod identity;
pub mod membership;
pub mod password;
pub mod record_id;
pub mod view;

pub use admin::{normalize_email, AdminAccount, AdminRole};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::{AdminChanges, AdminIdentity, NewAdmin, SyncPlan};
pub use membership::{Membership, MembershipStatus};
pub use password::{Password, DUMMY_PASSWORD_HASH};
pub use record_id::RecordId;
pub use view::{AdminView, CreatedAdmin};
