//! In-process collection with the same semantics as the hosted table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use super::Collection;
use crate::model::{Item, ItemPatch, ListRequest, NewItem};
use crate::page::{Page, PageInfo};
use crate::Error;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Item>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Table {
    /// Strictly increasing timestamps so `updated_at` ordering is total.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn position(&self, id: &str) -> Result<usize, Error> {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| Error::Remote(format!("no row with id {id}")))
    }
}

/// Vec-backed table. Clone-friendly via Arc.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    name: String,
    table: Arc<Mutex<Table>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), table: Arc::new(Mutex::new(Table::default())) }
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct row lookup, bypassing pagination.
    pub fn get(&self, id: &str) -> Option<Item> {
        self.table.lock().rows.iter().find(|row| row.id == id).cloned()
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, req: ListRequest) -> Result<Page<Item>, Error> {
        req.validate().map_err(Error::remote)?;

        let table = self.table.lock();
        let mut rows: Vec<Item> = table.rows.iter().filter(|row| req.filter.matches(row)).cloned().collect();
        rows.sort_by(|a, b| {
            let ord = a.updated_at.cmp(&b.updated_at);
            if req.sort.is_ascending() { ord } else { ord.reverse() }
        });

        let count = rows.len() as u64;
        let data: Vec<Item> = rows
            .into_iter()
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .collect();

        Ok(Page::new(data, PageInfo::compute(Some(count), req.limit, req.offset)))
    }

    async fn create(&self, item: NewItem) -> Result<Item, Error> {
        item.validate().map_err(Error::remote)?;

        let mut table = self.table.lock();
        let now = table.stamp();
        let row = Item {
            id: uuid::Uuid::new_v4().to_string(),
            title: item.title,
            content: item.content,
            done: false,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        tracing::debug!(collection = %self.name, id = %row.id, "row inserted");
        Ok(row)
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, Error> {
        patch.validate().map_err(Error::remote)?;

        let mut table = self.table.lock();
        let idx = table.position(id)?;
        let now = table.stamp();
        let row = &mut table.rows[idx];
        patch.apply(row);
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut table = self.table.lock();
        let idx = table.position(id)?;
        table.rows.remove(idx);
        tracing::debug!(collection = %self.name, id, "row deleted");
        Ok(())
    }
}
