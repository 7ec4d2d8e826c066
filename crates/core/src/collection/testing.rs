//! Failure-injecting collection wrapper for protocol tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{Collection, MemoryCollection};
use crate::model::{Item, ItemPatch, ListRequest, NewItem};
use crate::page::Page;
use crate::Error;

/// A gate that, once closed, holds callers until a permit is released.
#[derive(Debug)]
struct Gate {
    closed: AtomicBool,
    permits: Semaphore,
}

impl Default for Gate {
    fn default() -> Self {
        Self { closed: AtomicBool::new(false), permits: Semaphore::new(0) }
    }
}

impl Gate {
    async fn pass(&self) {
        if self.closed.load(Ordering::SeqCst)
            && let Ok(permit) = self.permits.acquire().await
        {
            permit.forget();
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FlakyCollection {
    pub(crate) inner: MemoryCollection,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    writes: Arc<Gate>,
    reads: Arc<Gate>,
    list_calls: Arc<AtomicUsize>,
}

impl FlakyCollection {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            inner: MemoryCollection::new(name),
            fail_writes: Arc::default(),
            fail_reads: Arc::default(),
            writes: Arc::default(),
            reads: Arc::default(),
            list_calls: Arc::default(),
        }
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Park every subsequent write until `release_write` is called.
    pub(crate) fn hold_writes(&self) {
        self.writes.closed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_write(&self) {
        self.writes.permits.add_permits(1);
    }

    pub(crate) fn hold_reads(&self) {
        self.reads.closed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_read(&self) {
        self.reads.permits.add_permits(1);
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Remote("injected write failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Collection for FlakyCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn list(&self, req: ListRequest) -> Result<Page<Item>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.reads.pass().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Remote("injected read failure".into()));
        }
        self.inner.list(req).await
    }

    async fn create(&self, item: NewItem) -> Result<Item, Error> {
        self.writes.pass().await;
        self.check_write()?;
        self.inner.create(item).await
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, Error> {
        self.writes.pass().await;
        self.check_write()?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.writes.pass().await;
        self.check_write()?;
        self.inner.delete(id).await
    }
}
