//! Derived-view cache.
//!
//! Augmented records are cached by `(record id, snapshot version)` rather
//! than by object identity. The version counter is bumped by the store on
//! every snapshot install, so invalidation is deterministic: a new version
//! supersedes all older entries for the same record.

use std::sync::Arc;

use dashmap::DashMap;

use crate::derive::{augment, AugmentedStockItem};
use crate::models::{StockItem, StockItemId};

#[derive(Debug)]
pub struct DerivedCache {
    entries: DashMap<(StockItemId, u64), Arc<AugmentedStockItem>>,
    capacity: usize,
}

impl DerivedCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns the cached augmented record for this snapshot version, or
    /// computes and caches it. `None` when the record is not ready for
    /// derivation.
    pub fn get_or_compute(
        &self,
        id: StockItemId,
        version: u64,
        item: &StockItem,
    ) -> Option<Arc<AugmentedStockItem>> {
        if let Some(hit) = self.entries.get(&(id, version)) {
            return Some(Arc::clone(&hit));
        }

        let augmented = Arc::new(augment(item)?);

        // Older versions of this record are superseded by the new snapshot.
        self.entries.retain(|(entry_id, _), _| *entry_id != id);
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert((id, version), Arc::clone(&augmented));

        Some(augmented)
    }

    pub fn get(&self, id: StockItemId, version: u64) -> Option<Arc<AugmentedStockItem>> {
        self.entries.get(&(id, version)).map(|e| Arc::clone(&e))
    }

    /// Drops every cached version of a record.
    pub fn invalidate(&self, id: StockItemId) {
        self.entries.retain(|(entry_id, _), _| *entry_id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
