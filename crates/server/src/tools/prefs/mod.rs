//! Preference tools.
//!
//! Both persist their value and return the refreshed page.

pub mod filter;
pub mod reorder;

pub use filter::{TodoSetFilterParams, set_filter_impl};
pub use reorder::{TodoReorderParams, reorder_impl};
