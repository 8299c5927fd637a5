//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// Page used when the query omits `page`.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the query omits `page_size`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// Range checks happen in the service.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Returns `(page, page_size)` with defaults applied.
    pub fn resolve(&self) -> (i64, i64) {
        (
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}
