//! Core types and shared functionality for the todos workspace.
//!
//! This crate provides:
//! - The todo item model, pagination and query identities
//! - The `Collection` port plus an in-memory implementation
//! - The optimistic reconciled query cache
//! - Preference persistence with a SQLite backend
//! - Unified error types and layered configuration

pub mod cache;
pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod notice;
pub mod page;
pub mod prefs;
pub mod query;
pub mod service;

pub use cache::{FetchOutcome, QueryCache, QueryState};
pub use collection::{Collection, MemoryCollection};
pub use config::{AppConfig, Backend, ConfigError};
pub use error::Error;
pub use model::{Filter, Item, ItemPatch, ListRequest, NewItem, SortDirection};
pub use notice::{Notice, NoticeKind};
pub use page::{Page, PageInfo};
pub use prefs::{MemoryStore, PreferenceStore, Preferences, PrefsDb, SlotItem};
pub use query::QueryIdentity;
pub use service::{PageView, TodoService};
