//! Lock-Backed LRU Cache
//!
//! A thread-safe LRU cache that keeps one [`LruCache`] behind a single
//! `parking_lot::Mutex`. Every public call takes the lock for exactly one store
//! operation, which gives the same linear history as the dispatcher-backed
//! [`SerializedLruCache`](super::SerializedLruCache) without a dedicated thread.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │        LockedLruCache         │
//! │   ┌────────┐   ┌──────────┐   │
//! │   │ Mutex  │──▶│ LruCache │   │
//! │   └────────┘   └──────────┘   │
//! └───────────────────────────────┘
//! ```
//!
//! # When to Use
//!
//! **Use LockedLruCache when:**
//! - Calls are short and a context switch per call would dominate
//! - You want zero-copy reads with [`get_with`](LockedLruCache::get_with)
//!
//! **Use SerializedLruCache when:**
//! - The store must never be touched by caller threads
//! - Keys or values are `Send` but not `Sync`
//!
//! Lock acquisition order is not FIFO, so two callers racing for the lock may
//! be served in either order. Each still observes one consistent history.
//!
//! # Example
//!
//! ```
//! use serial_lru::LockedLruCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(LockedLruCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for j in 0..1000 {
//!             cache.add(format!("key-{}-{}", i, j), j);
//!         }
//!     })
//! }).collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 4000);
//! ```

extern crate alloc;

use crate::concurrent::SharedCache;
use crate::config::LruCacheConfig;
use crate::error::Result;
use crate::lru::LruCache;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LRU cache guarded by one lock.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone`.
/// - `V`: Value type. `get` needs `Clone`; `get_with` does not.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct LockedLruCache<K, V, S = DefaultHashBuilder> {
    inner: Mutex<LruCache<K, V, S>>,
}

impl<K: Hash + Eq, V> LockedLruCache<K, V, DefaultHashBuilder> {
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::from_store(LruCache::new(cap))
    }

    /// Creates a cache from a plain count, rejecting zero.
    pub fn try_new(cap: usize) -> Result<Self> {
        LruCache::try_new(cap).map(Self::from_store)
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::from_store(LruCache::init(config, hasher))
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LockedLruCache<K, V, S> {
    /// Creates a cache whose store uses a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self::from_store(LruCache::with_hasher(cap, hash_builder))
    }

    /// Wraps an existing store, keeping its entries and recency order.
    pub fn from_store(store: LruCache<K, V, S>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Unwraps the store.
    pub fn into_inner(self) -> LruCache<K, V, S> {
        self.inner.into_inner()
    }

    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.inner.lock().cap()
    }

    /// Current number of entries, read under the lock.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns a clone of the value for `key`, promoting it on a hit.
    ///
    /// For values that are expensive to clone, use [`get_with`](Self::get_with).
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while the lock is held, promoting it
    /// on a hit. The lock is released after `f` returns.
    ///
    /// ```
    /// use serial_lru::LockedLruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = LockedLruCache::new(NonZeroUsize::new(4).unwrap());
    /// cache.add("greeting", String::from("hello world"));
    /// assert_eq!(cache.get_with("greeting", |v| v.len()), Some(11));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Deletes `key`. Absent keys are a no-op.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().remove(key);
    }

    /// Evicts the least recently used entry. Empty caches are a no-op.
    pub fn remove_oldest(&self) {
        self.inner.lock().remove_oldest();
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LockedLruCache<K, V, S> {
    /// Inserts or updates `key` and marks it most recently used.
    ///
    /// The replaced or evicted entry, if any, is dropped after the lock is
    /// released.
    pub fn add(&self, key: K, value: V) {
        let displaced = self.inner.lock().add(key, value);
        drop(displaced);
    }
}

impl<K, V, S> SharedCache<K, V> for LockedLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn add(&self, key: K, value: V) {
        LockedLruCache::add(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        LockedLruCache::get(self, key)
    }

    fn remove(&self, key: &K) {
        LockedLruCache::remove(self, key)
    }

    fn remove_oldest(&self) {
        LockedLruCache::remove_oldest(self)
    }

    fn len(&self) -> usize {
        LockedLruCache::len(self)
    }
}

impl<K, V, S> core::fmt::Debug for LockedLruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_lock() {
            Some(store) => f.debug_struct("LockedLruCache").field("store", &*store).finish(),
            None => f.debug_struct("LockedLruCache").finish_non_exhaustive(),
        }
    }
}
