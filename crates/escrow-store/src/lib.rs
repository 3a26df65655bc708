//! Escrow Store - Ordered key-value storage for the escrow module
//!
//! The store is:
//! - Ordered (prefix scans return keys in ascending byte order)
//! - Transactional (a `CacheStore` buffers writes and commits or discards them as one unit)
//! - Index-consistent (an `IndexedTable` writes primary and secondary entries together)
//!
//! # Invariants
//!
//! 1. A unique index entry exists iff its primary record exists
//! 2. Sequences only move forward
//! 3. Nothing reaches the parent store until `commit`

pub mod error;
pub mod kv;
pub mod cache;
pub mod keys;
pub mod item;
pub mod table;
pub mod records;

pub use error::*;
pub use kv::*;
pub use cache::*;
pub use keys::*;
pub use item::*;
pub use table::*;
