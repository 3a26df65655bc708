//! Order-preserving key encoding
//!
//! Variable-length segments are prefixed with a one-byte length so that a
//! composite key `(a, b)` can be prefix-scanned on `a` alone.

use escrow_types::Address;

use crate::error::{StoreError, StoreResult};

/// Types usable as (part of) a store key
pub trait KeyEncode {
    fn encode_key(&self, out: &mut Vec<u8>) -> StoreResult<()>;

    fn to_key(&self) -> StoreResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_key(&mut out)?;
        Ok(out)
    }
}

/// Append `bytes` with its one-byte length prefix
pub fn push_length_prefixed(out: &mut Vec<u8>, bytes: &[u8]) -> StoreResult<()> {
    let len = u8::try_from(bytes.len()).map_err(|_| StoreError::KeyTooLong(bytes.len()))?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

impl KeyEncode for Address {
    fn encode_key(&self, out: &mut Vec<u8>) -> StoreResult<()> {
        push_length_prefixed(out, self.as_bytes())
    }
}

// Big-endian so byte order matches numeric order.
impl KeyEncode for u64 {
    fn encode_key(&self, out: &mut Vec<u8>) -> StoreResult<()> {
        out.extend_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

impl<A: KeyEncode, B: KeyEncode> KeyEncode for (A, B) {
    fn encode_key(&self, out: &mut Vec<u8>) -> StoreResult<()> {
        self.0.encode_key(out)?;
        self.1.encode_key(out)
    }
}

impl<T: KeyEncode + ?Sized> KeyEncode for &T {
    fn encode_key(&self, out: &mut Vec<u8>) -> StoreResult<()> {
        (**self).encode_key(out)
    }
}
