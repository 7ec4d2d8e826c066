//! PostgREST query-string builders.
//!
//! Filters use the PostgREST operator syntax (`done=eq.true`); ordering is
//! always on `updated_at`.

use serde::Serialize;
use todos_core::{Filter, ListRequest, SortDirection};

/// Column every listing is ordered by.
const ORDER_COLUMN: &str = "updated_at";

/// Query string for a page read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub select: &'static str,
    pub order: String,
    pub offset: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<String>,
}

impl From<&ListRequest> for ListQuery {
    fn from(req: &ListRequest) -> Self {
        Self {
            select: "*",
            order: order_param(req.sort),
            offset: req.offset,
            limit: req.limit,
            done: done_param(req.filter),
        }
    }
}

/// Query string for the row count. Uses the same filter as the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountQuery {
    pub select: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<String>,
}

impl From<&ListRequest> for CountQuery {
    fn from(req: &ListRequest) -> Self {
        Self { select: "*", done: done_param(req.filter) }
    }
}

pub fn order_param(sort: SortDirection) -> String {
    let dir = if sort.is_ascending() { "asc" } else { "desc" };
    format!("{ORDER_COLUMN}.{dir}")
}

/// Equality predicate on `done`; `None` for the unfiltered listing.
pub fn done_param(filter: Filter) -> Option<String> {
    filter.done_value().map(|done| format!("eq.{done}"))
}

/// Row selector for single-row writes.
pub fn id_filter(id: &str) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{id}"))]
}
