//! Page-result assembly for catalog listings.
//!
//! A [`PageResult`] is computed fresh per list query and never persisted.
//! Navigation links are relative and exist only when the corresponding
//! direction exists.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ProductDto;

/// Outcome flag carried by a page result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Success,
    Error,
}

/// One page of catalog results with navigation state.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub status: PageStatus,
    pub payload: Vec<ProductDto>,
    pub total_pages: u64,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

/// Total page count for a result set.
///
/// An empty set still has one (empty) page, so page 1 stays addressable.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit).max(1)
}

impl PageResult {
    /// Assemble the navigation state for `page` of `total_pages`.
    ///
    /// Callers must have validated `page <= total_pages` already.
    pub fn assemble(payload: Vec<ProductDto>, page: u64, total_pages: u64) -> Self {
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        let prev_page = has_prev_page.then(|| page - 1);
        let next_page = has_next_page.then(|| page + 1);

        let prev_link = prev_page.map(|p| format!("/products?page={}", p));
        let next_link = next_page.map(|p| format!("/products?page={}", p));

        Self {
            status: PageStatus::Success,
            payload,
            total_pages,
            prev_page,
            next_page,
            page,
            has_prev_page,
            has_next_page,
            prev_link,
            next_link,
        }
    }
}
