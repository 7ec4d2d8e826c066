//! Local rewrite of a cached page for an optimistic mutation.

use crate::model::{Filter, Item, ItemPatch};
use crate::page::Page;

/// Apply `patch` to the row with `id`, dropping it if `filter` no longer
/// admits it. Pagination metadata is carried over unchanged; other rows are
/// untouched. A page without the row is returned as an identical copy.
pub(crate) fn rewrite(page: &Page<Item>, id: &str, patch: &ItemPatch, filter: Filter) -> Page<Item> {
    let data = page
        .data
        .iter()
        .filter_map(|item| {
            if item.id != id {
                return Some(item.clone());
            }
            let mut patched = item.clone();
            patch.apply(&mut patched);
            filter.matches(&patched).then_some(patched)
        })
        .collect();

    Page::new(data, page.info)
}
