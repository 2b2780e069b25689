//! In-memory retention cache
//!
//! Holds the local view of the user's posted items, keyed by item id. The
//! cache is populated by the scheduler's fetch operation and shrunk by its
//! eviction sweep; it is volatile and never persisted.
//!
//! The cache is deliberately not synchronized: every mutation happens
//! sequentially on the scheduler's control-loop task, which is the only
//! owner.

use std::collections::HashMap;

use crate::timeline::Item;

/// Mapping of item id to item, unordered
#[derive(Debug, Default)]
pub struct RetentionCache {
    items: HashMap<u64, Item>,
}

impl RetentionCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `item.id`. Idempotent.
    pub fn upsert(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    /// Applies `upsert` for each item. Order is irrelevant since keys are
    /// unique per id.
    pub fn upsert_all(&mut self, items: impl IntoIterator<Item = Item>) {
        for item in items {
            self.upsert(item);
        }
    }

    /// All current (id, item) pairs. No ordering is guaranteed.
    pub fn snapshot(&self) -> Vec<(u64, Item)> {
        self.items
            .iter()
            .map(|(id, item)| (*id, item.clone()))
            .collect()
    }

    /// Deletes the entry if present; no-op if absent.
    pub fn remove(&mut self, id: u64) {
        self.items.remove(&id);
    }

    /// Looks up an item by id
    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Number of cached items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no items are cached
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
