//! Repository layer for data access.

mod admin_repository;
pub mod entities;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

#[cfg(any(test, feature = "test-utils"))]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminStore};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryAdminStore;
