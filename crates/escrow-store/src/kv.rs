//! Key-value store abstraction and the in-memory backend

use std::collections::BTreeMap;
use std::ops::Bound;

/// One stored entry
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered byte-keyed store
///
/// Implementations are synchronous; the host serializes calls.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);

    /// Entries with `start <= key < end` in ascending key order
    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Every entry whose key begins with `prefix`, ascending
    fn scan_prefix(&self, prefix: &[u8]) -> Vec<KvPair> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref())
    }
}

/// Smallest key greater than every key starting with `prefix`
///
/// `None` when no such key exists (empty prefix or all `0xff`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

pub(crate) fn range_bounds<'a>(
    start: &'a [u8],
    end: Option<&'a [u8]>,
) -> (Bound<&'a [u8]>, Bound<&'a [u8]>) {
    let upper = match end {
        Some(end) => Bound::Excluded(end),
        None => Bound::Unbounded,
    };
    (Bound::Included(start), upper)
}

/// In-memory backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        if matches!(end, Some(end) if end <= start) {
            return Vec::new();
        }
        self.entries
            .range::<[u8], _>(range_bounds(start, end))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
