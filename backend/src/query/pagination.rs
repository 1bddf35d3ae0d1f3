//! Offset pagination for recipe listings

use super::PlanError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 10;

/// A page of a listing: `offset = (page - 1) * size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Page numbers start at 1; the size is clamped into `1..=MAX_PAGE_SIZE`
    pub fn new(page: Option<i64>, size: Option<i64>) -> Result<Self, PlanError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(PlanError::InvalidPage(page));
        }

        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        Ok(Self { page, size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}
