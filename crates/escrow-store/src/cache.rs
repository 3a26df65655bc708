//! Write-buffering transaction overlay
//!
//! A `CacheStore` reads through to its parent and keeps every write to
//! itself. `commit` flushes the buffered writes in one go; dropping the
//! cache discards them. Caches nest, so a call can open a sub-transaction
//! over an outer one.

use std::collections::BTreeMap;

use tracing::debug;

use crate::kv::{range_bounds, KvPair, KvStore};

/// Buffered view over a parent store
pub struct CacheStore<'a> {
    parent: &'a mut dyn KvStore,
    // `None` marks a deletion
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a mut dyn KvStore) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of keys written or deleted so far
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Flush every buffered write to the parent
    pub fn commit(self) {
        debug!(writes = self.writes.len(), "committing cache store");
        for (key, value) in self.writes {
            match value {
                Some(value) => self.parent.set(key, value),
                None => self.parent.delete(&key),
            }
        }
    }

    /// Drop every buffered write
    pub fn discard(self) {
        debug!(writes = self.writes.len(), "discarding cache store");
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        if matches!(end, Some(end) if end <= start) {
            return Vec::new();
        }
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.range(start, end).into_iter().collect();
        for (key, value) in self.writes.range::<[u8], _>(range_bounds(start, end)) {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}
