//! In-memory query cache with optimistic mutation and rollback.
//!
//! Each [`QueryIdentity`] owns one cached page. An optimistic mutation runs
//! through four steps:
//!
//! 1. Under the cache lock: bump the identity's generation (discarding any
//!    fetch already in flight), capture the current snapshot as the rollback
//!    target, and publish the locally patched page.
//! 2. Issue the remote write with the lock released.
//! 3. Under the cache lock again: on failure put the captured snapshot back
//!    verbatim; in both cases mark the identity stale.
//! 4. Spawn an unconditional refetch.
//!
//! The lock is never held across an `.await`, so steps 1 and 3 are each an
//! atomic critical section even on a multi-threaded runtime.
//!
//! Two mutations overlapping on one identity capture their rollback targets
//! in order, so the second one's target already contains the first one's
//! optimistic patch. A failure of the second restores that state, not the
//! page as it was before either mutation.

mod patch;
mod state;

pub use state::{FetchOutcome, QueryState};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::collection::Collection;
use crate::model::{Item, ItemPatch, ListRequest, SortDirection};
use crate::page::Page;
use crate::query::QueryIdentity;
use crate::Error;
use state::Entry;

struct Inner {
    collection: Arc<dyn Collection>,
    page_size: u32,
    sort: SortDirection,
    entries: Mutex<HashMap<QueryIdentity, Entry>>,
}

/// Cache of query pages over one collection. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("collection", &self.inner.collection.name())
            .field("page_size", &self.inner.page_size)
            .field("sort", &self.inner.sort)
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    pub fn new(collection: Arc<dyn Collection>, page_size: u32, sort: SortDirection) -> Self {
        Self {
            inner: Arc::new(Inner { collection, page_size: page_size.max(1), sort, entries: Mutex::new(HashMap::new()) }),
        }
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.inner.collection
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Read-only view of the cached page, if one has been fetched.
    pub fn snapshot(&self, query: &QueryIdentity) -> Option<Arc<Page<Item>>> {
        self.inner.entries.lock().get(query).and_then(|entry| entry.snapshot.clone())
    }

    pub fn state(&self, query: &QueryIdentity) -> QueryState {
        self.inner
            .entries
            .lock()
            .get(query)
            .map(|entry| entry.state)
            .unwrap_or(QueryState::Idle)
    }

    /// Whether the next read should go back to the remote collection.
    pub fn is_stale(&self, query: &QueryIdentity) -> bool {
        self.inner.entries.lock().get(query).is_none_or(|entry| entry.stale)
    }

    /// Fetch the page currently selected for `query` and replace the snapshot.
    pub async fn fetch(&self, query: &QueryIdentity) -> Result<FetchOutcome, Error> {
        let offset = self.inner.entries.lock().get(query).map(|entry| entry.offset).unwrap_or(0);
        self.fetch_at(query, offset).await
    }

    /// Fetch the 1-based `page` for `query`; later refetches stay on that page.
    pub async fn fetch_page(&self, query: &QueryIdentity, page: u32) -> Result<FetchOutcome, Error> {
        let offset = page.saturating_sub(1).saturating_mul(self.inner.page_size);
        self.fetch_at(query, offset).await
    }

    async fn fetch_at(&self, query: &QueryIdentity, offset: u32) -> Result<FetchOutcome, Error> {
        self.check_identity(query)?;

        let generation = self.inner.entries.lock().entry(query.clone()).or_default().generation;
        let req = ListRequest::new(self.inner.page_size, offset, self.inner.sort, query.filter);

        tracing::debug!(%query, offset, "fetching page");
        let page = self.inner.collection.list(req).await?;

        let mut entries = self.inner.entries.lock();
        let entry = entries.entry(query.clone()).or_default();
        if !entry.accepts_fetch(generation) {
            tracing::debug!(%query, "discarding fetch superseded by a mutation");
            return Ok(FetchOutcome::Discarded);
        }

        let page = Arc::new(page);
        entry.snapshot = Some(Arc::clone(&page));
        entry.stale = false;
        entry.offset = offset;
        Ok(FetchOutcome::Applied(page))
    }

    /// Serve the cached page when it is fresh, otherwise fetch it.
    pub async fn get_or_fetch(&self, query: &QueryIdentity) -> Result<Arc<Page<Item>>, Error> {
        if !self.is_stale(query)
            && let Some(page) = self.snapshot(query)
        {
            return Ok(page);
        }

        match self.fetch(query).await? {
            FetchOutcome::Applied(page) => Ok(page),
            FetchOutcome::Discarded => self.snapshot(query).ok_or_else(|| Error::NotCached(query.to_string())),
        }
    }

    /// Mark `query` stale and refetch it in the background.
    pub fn invalidate(&self, query: &QueryIdentity) {
        self.inner.entries.lock().entry(query.clone()).or_default().stale = true;
        self.schedule_refetch(query);
    }

    /// Mark every cached identity stale without fetching anything.
    pub fn mark_all_stale(&self) {
        for entry in self.inner.entries.lock().values_mut() {
            entry.stale = true;
        }
    }

    /// Mark every cached identity stale. Only `active` is refetched now; the
    /// others refetch on their next read.
    pub fn invalidate_all(&self, active: &QueryIdentity) {
        self.mark_all_stale();
        self.invalidate(active);
    }

    /// Wait for the most recently scheduled background refetch of `query`.
    pub async fn wait_for_refetch(&self, query: &QueryIdentity) {
        let handle = self.inner.entries.lock().get_mut(query).and_then(|entry| entry.refetch.take());
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(%query, error = %e, "refetch task failed to complete");
        }
    }

    /// Optimistically set `done = true` on `id` under `query`.
    pub async fn mark_done(&self, query: &QueryIdentity, id: &str) -> Result<Item, Error> {
        let collection = Arc::clone(&self.inner.collection);
        self.mutate(query, id, ItemPatch::done(), collection.mark_done(id)).await
    }

    /// Optimistically apply an arbitrary patch to `id` under `query`.
    pub async fn update(&self, query: &QueryIdentity, id: &str, patch: ItemPatch) -> Result<Item, Error> {
        patch.validate()?;
        let collection = Arc::clone(&self.inner.collection);
        self.mutate(query, id, patch.clone(), collection.update(id, patch)).await
    }

    async fn mutate<F>(&self, query: &QueryIdentity, id: &str, patch: ItemPatch, remote: F) -> Result<Item, Error>
    where
        F: Future<Output = Result<Item, Error>>,
    {
        self.check_identity(query)?;

        let pending = self.begin(query, id, &patch);
        let result = remote.await;
        pending.settle(result.as_ref().err());
        result
    }

    /// Capture the rollback target and publish the optimistic page.
    ///
    /// The returned guard settles the mutation exactly once. Dropping it
    /// unsettled (the caller's future was cancelled) rolls the page back.
    fn begin(&self, query: &QueryIdentity, id: &str, patch: &ItemPatch) -> PendingMutation<'_> {
        let mut entries = self.inner.entries.lock();
        let entry = entries.entry(query.clone()).or_default();

        entry.begin_mutation();
        let rollback = entry.snapshot.clone();
        if let Some(current) = &rollback {
            entry.snapshot = Some(Arc::new(patch::rewrite(current, id, patch, query.filter)));
        }

        tracing::debug!(%query, id, in_flight = entry.in_flight(), "optimistic patch applied");
        PendingMutation { cache: self, query: query.clone(), id: id.to_string(), rollback, settled: false }
    }

    fn settle(&self, query: &QueryIdentity, rollback: Option<Arc<Page<Item>>>, restore: bool) {
        let mut entries = self.inner.entries.lock();
        let entry = entries.entry(query.clone()).or_default();

        let remaining = entry.start_settlement();
        if restore {
            entry.snapshot = rollback;
        }
        entry.finish_settlement(remaining);
    }

    /// Outside a runtime (a guard dropped during shutdown) the entry is left
    /// stale and the next read refetches it.
    fn schedule_refetch(&self, query: &QueryIdentity) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(%query, "no runtime, refetch deferred to next read");
            return;
        };

        let cache = self.clone();
        let target = query.clone();
        let handle = runtime.spawn(async move {
            if let Err(e) = cache.fetch(&target).await {
                tracing::warn!(query = %target, error = %e, "background refetch failed");
            }
        });

        let mut entries = self.inner.entries.lock();
        entries.entry(query.clone()).or_default().refetch = Some(handle);
    }

    fn check_identity(&self, query: &QueryIdentity) -> Result<(), Error> {
        if query.collection != self.inner.collection.name() {
            return Err(Error::InvalidInput(format!(
                "query {query} does not address collection {}",
                self.inner.collection.name()
            )));
        }
        Ok(())
    }
}

/// An optimistic patch awaiting its remote outcome.
struct PendingMutation<'a> {
    cache: &'a QueryCache,
    query: QueryIdentity,
    id: String,
    rollback: Option<Arc<Page<Item>>>,
    settled: bool,
}

impl PendingMutation<'_> {
    fn settle(mut self, failure: Option<&Error>) {
        if let Some(err) = failure {
            tracing::warn!(query = %self.query, id = %self.id, error = %err, "remote write failed, restoring snapshot");
        }
        self.finish(failure.is_some());
    }

    fn finish(&mut self, restore: bool) {
        self.settled = true;
        self.cache.settle(&self.query, self.rollback.take(), restore);
        self.cache.schedule_refetch(&self.query);
    }
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(query = %self.query, id = %self.id, "mutation cancelled before its outcome, restoring snapshot");
            self.finish(true);
        }
    }
}
