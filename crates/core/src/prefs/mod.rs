//! Presentation preferences: the chosen filter and saved card ordering.
//!
//! Values are plain strings behind a [`PreferenceStore`] port so the service
//! never touches a global key/value store directly.

mod connection;
mod memory;
mod migrations;
mod slots;

pub use connection::PrefsDb;
pub use memory::MemoryStore;
pub use slots::{SlotItem, arrange};

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::Filter;
use crate::Error;

/// Key holding the active filter (`all`, `done`, `undone`).
pub const FILTER_KEY: &str = "filter";

/// Key holding the JSON slot ordering.
pub const SLOT_KEY: &str = "slotItem";

/// String key/value persistence.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Typed access to the stored preferences.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Stored filter. Missing or unrecognised values read as `All`.
    pub async fn filter(&self) -> Result<Filter, Error> {
        let Some(raw) = self.store.get(FILTER_KEY).await? else {
            return Ok(Filter::All);
        };
        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "ignoring unknown stored filter");
            Filter::All
        }))
    }

    pub async fn set_filter(&self, filter: Filter) -> Result<(), Error> {
        self.store.set(FILTER_KEY, filter.as_str()).await
    }

    /// Stored slot ordering. Unreadable JSON reads as no ordering.
    pub async fn slot_order(&self) -> Result<Vec<SlotItem>, Error> {
        let Some(raw) = self.store.get(SLOT_KEY).await? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable slot order");
            Vec::new()
        }))
    }

    pub async fn set_slot_order(&self, slots: &[SlotItem]) -> Result<(), Error> {
        let json = serde_json::to_string(slots)
            .map_err(|e| Error::InvalidPreference { key: SLOT_KEY.into(), reason: e.to_string() })?;
        self.store.set(SLOT_KEY, &json).await
    }
}
