//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size for paginated listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page_no=&limit=`).
///
/// The offset into the collection is `page_no * limit`, newest first.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Clamped page size.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset implied by the page number.
    pub fn skip(&self) -> i64 {
        self.page_no.unwrap_or(0).max(0) * self.limit()
    }
}

/// Query parameters for name-based substring search (`?name=`).
#[derive(Debug, Deserialize)]
pub struct NameSearchParams {
    pub name: String,
}

/// Query parameters for title-based substring search (`?title=`).
#[derive(Debug, Deserialize)]
pub struct TitleSearchParams {
    pub title: String,
}

/// A bare `?limit=` parameter for capped listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
