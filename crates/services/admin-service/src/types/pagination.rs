//! Pagination for list endpoints.

use domain::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// 1-based page selection. Missing or zero values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub page: Option<u64>,
}

impl PageParams {
    pub fn new(limit: u64, page: u64) -> Self {
        Self {
            limit: Some(limit),
            page: Some(page),
        }
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        match self.limit {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(limit) => limit.min(MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u64 {
        match self.page {
            Some(0) | None => DEFAULT_PAGE_NUMBER,
            Some(page) => page,
        }
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}
