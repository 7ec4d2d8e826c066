//! The remote collection port.
//!
//! A `Collection` is one named table reachable through five operations.
//! Every failure, whatever its cause, comes back as `Error::Remote`;
//! `Error::InvalidInput` is only produced by local validation before a call.

mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryCollection;

use async_trait::async_trait;

use crate::model::{Item, ItemPatch, ListRequest, NewItem};
use crate::page::Page;
use crate::Error;

#[async_trait]
pub trait Collection: Send + Sync + 'static {
    /// Table name, used as the first half of a query identity.
    fn name(&self) -> &str;

    /// Read one page ordered by `updated_at`. No side effects.
    async fn list(&self, req: ListRequest) -> Result<Page<Item>, Error>;

    /// Insert a row; the server assigns id, timestamps and `done = false`.
    async fn create(&self, item: NewItem) -> Result<Item, Error>;

    /// Replace the given fields of the row with `id`.
    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, Error>;

    /// Set `done = true`. Calling it on an already-done row succeeds.
    async fn mark_done(&self, id: &str) -> Result<Item, Error> {
        self.update(id, ItemPatch::done()).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error>;
}
