//! Paginated results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pagination metadata for one page. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageInfo {
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub previous_page: Option<u32>,
    pub total_pages: u32,
}

impl PageInfo {
    /// Derive page pointers from a row count and the request window.
    ///
    /// An unknown count is treated as a single page.
    pub fn compute(count: Option<u64>, limit: u32, offset: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = match count {
            Some(count) => u32::try_from(count.div_ceil(u64::from(limit))).unwrap_or(u32::MAX),
            None => 1,
        };
        let current_page = offset / limit + 1;
        let next_page = (current_page < total_pages).then_some(current_page + 1);
        let previous_page = (current_page > 1).then_some(current_page - 1);

        Self { current_page, next_page, previous_page, total_pages }
    }
}

/// An ordered page of rows plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, info: PageInfo) -> Self {
        Self { data, info }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
