//! Concurrent Cache Front Ends
//!
//! Two ways to share one [`LruCache`](crate::LruCache) between threads. Both
//! keep the store's exact sequential semantics and hand out only fully applied
//! results. Each public call blocks until its operation has been committed.
//!
//! | Type | Serialization | Description |
//! |------|---------------|-------------|
//! | [`SerializedLruCache`] | one dispatcher thread | Store owned by a single thread, fed through a mailbox |
//! | [`LockedLruCache`] | `parking_lot::Mutex` | Store behind one lock, each call holds it for one operation |
//!
//! # Architecture
//!
//! ```text
//!  caller ─┐                    ┌──────────────────────────────┐
//!  caller ─┼─▶ Request ──▶ mailbox ──▶ dispatcher thread       │
//!  caller ─┘      │             │        owns LruCache         │
//!       ▲         │             │        applies one at a time │
//!       └── reply ◀─────────────┴──────────────────────────────┘
//! ```
//!
//! The store never leaves the dispatcher thread, so it needs no locking of its
//! own. Requests from one caller are applied in the order that caller issued
//! them, because each call waits for its reply before returning. Requests from
//! different callers are applied in the order the mailbox delivers them; every
//! caller observes the same single history.
//!
//! ## Reads Are Writes
//!
//! An LRU `get` moves the entry to the front of the recency list, so every
//! operation mutates the store. `LockedLruCache` takes its lock exclusively
//! for all of them.
//!
//! # Capability Interface
//!
//! Both types implement [`SharedCache`], so code that only needs the five
//! cache operations can be written once:
//!
//! ```
//! use serial_lru::concurrent::{LockedLruCache, SerializedLruCache, SharedCache};
//! use core::num::NonZeroUsize;
//!
//! fn warm<C: SharedCache<u32, String>>(cache: &C) {
//!     for id in 0..4 {
//!         cache.add(id, format!("user-{}", id));
//!     }
//! }
//!
//! let cap = NonZeroUsize::new(3).unwrap();
//! let serialized = SerializedLruCache::new(cap).unwrap();
//! let locked = LockedLruCache::new(cap);
//! warm(&serialized);
//! warm(&locked);
//! assert_eq!(SharedCache::len(&serialized), 3);
//! assert_eq!(SharedCache::get(&locked, &0), None);
//! ```

mod locked;
mod serialized;

pub use self::locked::LockedLruCache;
pub use self::serialized::SerializedLruCache;

/// The operations a concurrent LRU cache exposes to its collaborators.
///
/// Every method takes `&self` and may be called from any number of threads.
/// Each call returns only after its effect has been applied.
pub trait SharedCache<K, V> {
    /// Inserts or updates `key` and marks it most recently used.
    fn add(&self, key: K, value: V);

    /// Returns a copy of the value for `key`, promoting it on a hit.
    fn get(&self, key: &K) -> Option<V>;

    /// Deletes `key`. Absent keys are a no-op.
    fn remove(&self, key: &K);

    /// Evicts the least recently used entry. Empty caches are a no-op.
    fn remove_oldest(&self);

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
