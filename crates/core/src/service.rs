//! Application service tying the collection, cache and preferences together.
//!
//! Plain mutations (add, edit, delete) go straight to the collection and then
//! invalidate. Completing an item goes through the optimistic cache path.

use std::sync::Arc;

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cache::{FetchOutcome, QueryCache};
use crate::collection::Collection;
use crate::config::AppConfig;
use crate::model::{Filter, Item, ItemPatch, NewItem, SortDirection};
use crate::notice::Notice;
use crate::page::PageInfo;
use crate::prefs::{Preferences, SlotItem, arrange};
use crate::query::QueryIdentity;
use crate::Error;

/// The active page as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageView {
    pub filter: Filter,
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub info: PageInfo,
}

#[derive(Debug)]
pub struct TodoService {
    cache: QueryCache,
    prefs: Preferences,
    filter: RwLock<Filter>,
}

impl TodoService {
    /// Build the service, reading the persisted filter to pick the active
    /// query identity.
    pub async fn open(
        collection: Arc<dyn Collection>, prefs: Preferences, page_size: u32, sort: SortDirection,
    ) -> Result<Self, Error> {
        let filter = prefs.filter().await?;
        tracing::info!(collection = collection.name(), %filter, page_size, "todo service ready");
        Ok(Self { cache: QueryCache::new(collection, page_size, sort), prefs, filter: RwLock::new(filter) })
    }

    pub async fn from_config(
        collection: Arc<dyn Collection>, prefs: Preferences, config: &AppConfig,
    ) -> Result<Self, Error> {
        Self::open(collection, prefs, config.page_size, config.sort).await
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn filter(&self) -> Filter {
        *self.filter.read()
    }

    pub fn active_query(&self) -> QueryIdentity {
        QueryIdentity::new(self.cache.collection().name(), self.filter())
    }

    /// Current page for the active filter, arranged by the saved slot order.
    pub async fn open_page(&self) -> Result<PageView, Error> {
        let query = self.active_query();
        let page = self.cache.get_or_fetch(&query).await?;
        self.view(query.filter, &page.data, page.info).await
    }

    /// Jump to a 1-based page of the active filter.
    pub async fn goto_page(&self, page: u32) -> Result<PageView, Error> {
        if page == 0 {
            return Err(Error::InvalidInput("page numbers start at 1".into()));
        }
        let query = self.active_query();
        let page = match self.cache.fetch_page(&query, page).await? {
            FetchOutcome::Applied(page) => page,
            FetchOutcome::Discarded => {
                return Err(Error::NotCached(format!("page {page} of {query} is busy with a pending change, retry")));
            }
        };
        self.view(query.filter, &page.data, page.info).await
    }

    async fn view(&self, filter: Filter, items: &[Item], info: PageInfo) -> Result<PageView, Error> {
        let slots = self.prefs.slot_order().await?;
        let items = arrange(items, &slots).into_iter().cloned().collect();
        Ok(PageView { filter, items, info })
    }

    pub async fn add(&self, item: NewItem) -> Notice {
        if let Err(e) = item.validate() {
            return Notice::invalid(e.to_string());
        }
        match self.cache.collection().create(item).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "todo added");
                self.cache.invalidate_all(&self.active_query());
                Notice::added()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to add todo");
                Notice::add_failed()
            }
        }
    }

    /// Replace title and content of an existing item.
    pub async fn edit(&self, id: &str, item: NewItem) -> Notice {
        if let Err(e) = item.validate() {
            return Notice::invalid(e.to_string());
        }
        match self.cache.collection().update(id, ItemPatch::from(item)).await {
            Ok(_) => {
                tracing::info!(id, "todo updated");
                self.cache.invalidate_all(&self.active_query());
                Notice::updated()
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to update todo");
                Notice::update_failed()
            }
        }
    }

    pub async fn remove(&self, id: &str) -> Notice {
        match self.cache.collection().delete(id).await {
            Ok(()) => {
                tracing::info!(id, "todo deleted");
                self.cache.invalidate_all(&self.active_query());
                Notice::deleted()
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to delete todo");
                Notice::delete_failed()
            }
        }
    }

    /// Mark an item done through the optimistic path.
    pub async fn complete(&self, id: &str) -> Notice {
        let query = self.active_query();
        let result = self.cache.mark_done(&query, id).await;
        // Other filters may now list the item differently.
        self.cache.mark_all_stale();
        match result {
            Ok(_) => Notice::completed(),
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to mark todo done");
                Notice::complete_failed()
            }
        }
    }

    /// Persist and switch the active filter.
    pub async fn set_filter(&self, filter: Filter) -> Result<(), Error> {
        self.prefs.set_filter(filter).await?;
        *self.filter.write() = filter;
        tracing::debug!(%filter, "active filter changed");
        Ok(())
    }

    pub async fn reorder(&self, slots: &[SlotItem]) -> Result<(), Error> {
        self.prefs.set_slot_order(slots).await
    }
}
