//! Singleton values and monotonic sequences

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::kv::KvStore;

/// A single serde value stored under a fixed key
pub struct Item<T> {
    key: Vec<u8>,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Item<T> {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn get(&self, store: &dyn KvStore) -> StoreResult<Option<T>> {
        store
            .get(&self.key)
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(StoreError::from)
    }

    pub fn set(&self, store: &mut dyn KvStore, value: &T) -> StoreResult<()> {
        store.set(self.key.clone(), serde_json::to_vec(value)?);
        Ok(())
    }
}

/// Store-resident monotonic counter
///
/// Holds the next value to hand out. Values are never reissued, even after
/// the record that used them is deleted.
pub struct Sequence {
    key: Vec<u8>,
    name: &'static str,
    start: u64,
}

impl Sequence {
    pub fn new(name: &'static str, key: impl Into<Vec<u8>>, start: u64) -> Self {
        Self {
            key: key.into(),
            name,
            start,
        }
    }

    /// Next value without consuming it
    pub fn peek(&self, store: &dyn KvStore) -> StoreResult<u64> {
        match store.get(&self.key) {
            None => Ok(self.start),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Serialization(format!(
                        "sequence {} holds {} bytes",
                        self.name,
                        bytes.len()
                    ))
                })?;
                Ok(u64::from_be_bytes(raw))
            }
        }
    }

    /// Consume and return the next value
    pub fn next(&self, store: &mut dyn KvStore) -> StoreResult<u64> {
        let value = self.peek(store)?;
        let following = value
            .checked_add(1)
            .ok_or_else(|| StoreError::SequenceOverflow(self.name.to_string()))?;
        self.set(store, following);
        Ok(value)
    }

    /// Overwrite the next value, e.g. at genesis
    pub fn set(&self, store: &mut dyn KvStore, value: u64) {
        store.set(self.key.clone(), value.to_be_bytes().to_vec());
    }
}
