#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Choosing a Type
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                Which cache type should I use?                      │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                                                                    │
//! │  Shared between threads?                                           │
//! │        │                                                           │
//! │   No   │   Yes ──▶ Must the store stay on one thread?               │
//! │        ▼                  │                                        │
//! │  ┌──────────┐        Yes  │  No                                    │
//! │  │ LruCache │         │   │                                        │
//! │  └──────────┘         ▼   ▼                                        │
//! │           ┌────────────────────┐  ┌────────────────┐               │
//! │           │ SerializedLruCache │  │ LockedLruCache │               │
//! │           └────────────────────┘  └────────────────┘               │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Type | Thread-safe | Serialization | `get` returns |
//! |------|-------------|---------------|---------------|
//! | [`LruCache`] | No (`&mut self`) | caller's responsibility | `Option<&V>` |
//! | [`SerializedLruCache`] | Yes | single dispatcher thread | `Option<V>` (clone) |
//! | [`LockedLruCache`] | Yes | one `parking_lot::Mutex` | `Option<V>` (clone) |
//!
//! ## Sequential Store
//!
//! ```rust
//! use serial_lru::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
//! cache.add("a", 1);
//! cache.add("b", 2);
//! cache.get(&"a");          // "a" is now most recently used
//! cache.add("c", 3);        // evicts "b"
//! assert!(cache.get(&"b").is_none());
//! assert_eq!(cache.peek_oldest(), Some((&"a", &1)));
//! ```
//!
//! ## Concurrent Caches
//!
//! Enabled by the default `concurrent` feature.
//!
//! ```rust
//! use serial_lru::SerializedLruCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(SerializedLruCache::try_new(1_000).unwrap());
//!
//! let writer = {
//!     let cache = Arc::clone(&cache);
//!     std::thread::spawn(move || cache.add("key".to_string(), 42))
//! };
//! writer.join().unwrap();
//!
//! assert_eq!(cache.get("key"), Some(42));
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: The sequential LRU store
//! - [`config`]: Configuration structures
//! - [`error`]: Construction errors
//! - [`concurrent`]: Thread-safe front ends (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Intrusive doubly linked list backing the recency order.
///
/// **Note**: This module is internal infrastructure. It hands out raw node
/// pointers and relies on its owner to keep them valid.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Construction errors.
pub mod error;

/// Least Recently Used (LRU) store.
///
/// A fixed-size, single-threaded store that evicts the least recently used
/// entry when a new key arrives at capacity.
pub mod lru;

/// Thread-safe front ends over the LRU store.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::{CacheError, Result};
pub use lru::LruCache;

#[cfg(feature = "concurrent")]
pub use concurrent::{LockedLruCache, SerializedLruCache, SharedCache};
