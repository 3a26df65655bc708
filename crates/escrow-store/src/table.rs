//! Tables with a unique secondary index
//!
//! Every write goes through the table, which updates the primary record
//! and its index entry against the same store. Inside a `CacheStore` that
//! makes both land or neither.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::keys::KeyEncode;
use crate::kv::{prefix_end, KvStore};

/// Default and maximum page sizes for table scans
pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1000;

/// A record kept in an [`IndexedTable`]
pub trait Indexed: Serialize + DeserializeOwned {
    type PrimaryKey: KeyEncode;
    type IndexKey: KeyEncode;

    fn primary_key(&self) -> Self::PrimaryKey;

    /// Globally unique secondary key
    fn index_key(&self) -> Self::IndexKey;
}

/// Key-based pagination request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Resume from this key (as returned in `PageResponse::next_key`)
    pub key: Option<Vec<u8>>,
    /// Zero means `DEFAULT_PAGE_LIMIT`
    pub limit: usize,
}

impl PageRequest {
    pub fn with_limit(limit: usize) -> Self {
        Self { key: None, limit }
    }

    fn effective_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_PAGE_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Key to pass back for the next page; `None` when exhausted
    pub next_key: Option<Vec<u8>>,
}

/// Which ordering a scan walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    Primary,
    Index,
}

/// Primary records under `primary_prefix`, unique index under `index_prefix`
///
/// Index entries map the encoded secondary key to the encoded primary key.
pub struct IndexedTable<V> {
    name: &'static str,
    primary_prefix: Vec<u8>,
    index_prefix: Vec<u8>,
    _marker: PhantomData<V>,
}

impl<V: Indexed> IndexedTable<V> {
    pub fn new(name: &'static str, primary_prefix: &[u8], index_prefix: &[u8]) -> Self {
        Self {
            name,
            primary_prefix: primary_prefix.to_vec(),
            index_prefix: index_prefix.to_vec(),
            _marker: PhantomData,
        }
    }

    fn primary_store_key(&self, pk: &V::PrimaryKey) -> StoreResult<(Vec<u8>, Vec<u8>)> {
        let encoded = pk.to_key()?;
        let mut key = self.primary_prefix.clone();
        key.extend_from_slice(&encoded);
        Ok((key, encoded))
    }

    fn index_store_key(&self, ik: &V::IndexKey) -> StoreResult<Vec<u8>> {
        let mut key = self.index_prefix.clone();
        ik.encode_key(&mut key)?;
        Ok(key)
    }

    fn decode(&self, bytes: &[u8]) -> StoreResult<V> {
        serde_json::from_slice(bytes).map_err(|e| {
            StoreError::Serialization(format!("{} record: {}", self.name, e))
        })
    }

    /// Insert a new record together with its index entry
    ///
    /// Fails with `Duplicate` if either key is taken.
    pub fn insert(&self, store: &mut dyn KvStore, value: &V) -> StoreResult<()> {
        let (primary_key, encoded_pk) = self.primary_store_key(&value.primary_key())?;
        let index_key = self.index_store_key(&value.index_key())?;

        if store.has(&primary_key) {
            return Err(StoreError::Duplicate(format!(
                "{} primary key already present",
                self.name
            )));
        }
        if store.has(&index_key) {
            return Err(StoreError::Duplicate(format!(
                "{} index key already present",
                self.name
            )));
        }

        store.set(primary_key, serde_json::to_vec(value)?);
        store.set(index_key, encoded_pk);
        Ok(())
    }

    pub fn get(&self, store: &dyn KvStore, pk: &V::PrimaryKey) -> StoreResult<Option<V>> {
        let (primary_key, _) = self.primary_store_key(pk)?;
        store.get(&primary_key).map(|b| self.decode(&b)).transpose()
    }

    pub fn has(&self, store: &dyn KvStore, pk: &V::PrimaryKey) -> StoreResult<bool> {
        let (primary_key, _) = self.primary_store_key(pk)?;
        Ok(store.has(&primary_key))
    }

    /// Look a record up through the unique index
    pub fn get_by_index(&self, store: &dyn KvStore, ik: &V::IndexKey) -> StoreResult<Option<V>> {
        let index_key = self.index_store_key(ik)?;
        let Some(encoded_pk) = store.get(&index_key) else {
            return Ok(None);
        };
        self.load_indexed(store, &encoded_pk).map(Some)
    }

    fn load_indexed(&self, store: &dyn KvStore, encoded_pk: &[u8]) -> StoreResult<V> {
        let mut primary_key = self.primary_prefix.clone();
        primary_key.extend_from_slice(encoded_pk);
        let bytes = store.get(&primary_key).ok_or_else(|| {
            StoreError::IndexCorrupted(format!("{} index points at a missing record", self.name))
        })?;
        self.decode(&bytes)
    }

    /// Remove a record and its index entry; returns the removed record
    pub fn remove(&self, store: &mut dyn KvStore, pk: &V::PrimaryKey) -> StoreResult<Option<V>> {
        let (primary_key, _) = self.primary_store_key(pk)?;
        let Some(bytes) = store.get(&primary_key) else {
            return Ok(None);
        };
        let value = self.decode(&bytes)?;
        let index_key = self.index_store_key(&value.index_key())?;
        store.delete(&primary_key);
        store.delete(&index_key);
        Ok(Some(value))
    }

    /// All records, ordered by primary or index key
    pub fn all(&self, store: &dyn KvStore, order: ScanOrder) -> StoreResult<Vec<V>> {
        match order {
            ScanOrder::Primary => store
                .scan_prefix(&self.primary_prefix)
                .into_iter()
                .map(|(_, v)| self.decode(&v))
                .collect(),
            ScanOrder::Index => store
                .scan_prefix(&self.index_prefix)
                .into_iter()
                .map(|(_, pk)| self.load_indexed(store, &pk))
                .collect(),
        }
    }

    /// One page of records
    ///
    /// `within` narrows a primary-order scan to keys starting with the
    /// given encoded prefix (e.g. the first component of a composite key).
    pub fn page(
        &self,
        store: &dyn KvStore,
        order: ScanOrder,
        within: Option<&[u8]>,
        request: &PageRequest,
    ) -> StoreResult<(Vec<V>, PageResponse)> {
        let mut prefix = match order {
            ScanOrder::Primary => self.primary_prefix.clone(),
            ScanOrder::Index => self.index_prefix.clone(),
        };
        if let Some(within) = within {
            prefix.extend_from_slice(within);
        }

        let start = match &request.key {
            Some(key) => {
                let mut start = match order {
                    ScanOrder::Primary => self.primary_prefix.clone(),
                    ScanOrder::Index => self.index_prefix.clone(),
                };
                start.extend_from_slice(key);
                if start < prefix {
                    prefix.clone()
                } else {
                    start
                }
            }
            None => prefix.clone(),
        };
        let end = prefix_end(&prefix);
        let limit = request.effective_limit();

        // one extra entry tells us whether another page exists
        let mut entries = store.range(&start, end.as_deref());
        entries.truncate(limit + 1);

        let next_key = if entries.len() > limit {
            entries.pop().map(|(key, _)| {
                let table_prefix_len = match order {
                    ScanOrder::Primary => self.primary_prefix.len(),
                    ScanOrder::Index => self.index_prefix.len(),
                };
                key[table_prefix_len..].to_vec()
            })
        } else {
            None
        };

        let records = entries
            .into_iter()
            .map(|(_, v)| match order {
                ScanOrder::Primary => self.decode(&v),
                ScanOrder::Index => self.load_indexed(store, &v),
            })
            .collect::<StoreResult<Vec<V>>>()?;

        Ok((records, PageResponse { next_key }))
    }

    /// Cross-check primary records against index entries
    ///
    /// Returns one message per inconsistency; empty when healthy.
    pub fn check_consistency(&self, store: &dyn KvStore) -> StoreResult<Vec<String>> {
        let mut problems = Vec::new();

        let primary = store.scan_prefix(&self.primary_prefix);
        for (key, bytes) in &primary {
            let value = self.decode(bytes)?;
            let index_key = self.index_store_key(&value.index_key())?;
            let encoded_pk = &key[self.primary_prefix.len()..];
            match store.get(&index_key) {
                Some(pointer) if pointer == encoded_pk => {}
                Some(_) => problems.push(format!(
                    "{} index entry points at a different record",
                    self.name
                )),
                None => problems.push(format!("{} record has no index entry", self.name)),
            }
        }

        let index_entries = store.scan_prefix(&self.index_prefix);
        if index_entries.len() != primary.len() {
            problems.push(format!(
                "{} has {} records but {} index entries",
                self.name,
                primary.len(),
                index_entries.len()
            ));
        }

        Ok(problems)
    }
}
