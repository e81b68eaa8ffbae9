//! Least Recently Used (LRU) Store
//!
//! The sequential half of the crate: a fixed-capacity map that keeps its
//! entries in order of recency and evicts from the cold end. Every operation
//! is O(1).
//!
//! # Algorithm
//!
//! Entries live in a doubly linked list ordered from most recently used
//! (front) to least recently used (back). A hash index maps each key to its
//! list node so that lookups can find a node and unlink or promote it without
//! walking the list.
//!
//! ```text
//!   index: key ──▶ node
//!
//!   front (MRU)                                   back (LRU)
//!   [head] ⇄ (k3,v3) ⇄ (k1,v1) ⇄ (k2,v2) ⇄ [tail]
//!               ▲                    │
//!          add / get hit        evicted first
//! ```
//!
//! - **add** of a new key links it at the front, evicting the back entry first
//!   when the store is full.
//! - **add** of an existing key overwrites its value and moves it to the front.
//!   The entry count does not change, so nothing is evicted.
//! - **get** hit moves the entry to the front. A miss changes nothing.
//! - **remove** / **remove_oldest** unlink one entry or do nothing.
//!
//! # Thread Safety
//!
//! `LruCache` is not thread-safe: every mutating call takes `&mut self`. Share
//! it across threads through [`SerializedLruCache`](crate::SerializedLruCache)
//! or [`LockedLruCache`](crate::LockedLruCache).

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::Result;
use crate::list::{Entry, List};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use tracing::trace;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A fixed-capacity Least Recently Used store.
///
/// # Safety
///
/// The index holds raw pointers into `list`. A pointer stays valid while its
/// key is in the index: nodes are only freed through `list.remove` or
/// `list.remove_last`, and both paths drop the index slot in the same call.
///
/// # Examples
///
/// ```
/// use serial_lru::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.add("apple", 1);
/// cache.add("banana", 2);
///
/// // A hit promotes "apple" to most recently used
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // so the next insertion evicts "banana"
/// cache.add("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List<(K, V)>,
    map: HashMap<K, *mut Entry<(K, V)>, S>,
}

// SAFETY: the store owns every node its pointers refer to, so sending it sends the
// keys and values along with it. No pointer is ever shared outside the store.
unsafe impl<K: Send, V: Send, S: Send> Send for LruCache<K, V, S> {}

// SAFETY: every mutation requires `&mut self`; `&self` methods only read.
unsafe impl<K: Sync, V: Sync, S: Sync> Sync for LruCache<K, V, S> {}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a store holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a store from a plain count, rejecting zero.
    ///
    /// ```
    /// use serial_lru::{CacheError, LruCache};
    ///
    /// assert!(matches!(LruCache::<u32, u32>::try_new(0), Err(CacheError::ZeroCapacity)));
    /// assert_eq!(LruCache::<u32, u32>::try_new(4).unwrap().cap().get(), 4);
    /// ```
    pub fn try_new(cap: usize) -> Result<LruCache<K, V, DefaultHashBuilder>> {
        let config = LruCacheConfig::try_from_capacity(cap)?;
        Ok(LruCache::init(config, None))
    }

    /// Creates a store from a configuration, with an optional hasher.
    pub fn init(
        config: LruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_config_and_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a store with the given capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self::with_config_and_hasher(LruCacheConfig::new(cap), hash_builder)
    }

    fn with_config_and_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        LruCache {
            config,
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(config.capacity.get(), hash_builder),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Current number of entries. Does not touch recency.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the store holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our index, so it is linked into our list
        unsafe {
            self.list.move_to_front(node);
            Some(&(*node).get_value().1)
        }
    }

    /// Like [`get`](Self::get), but hands out a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our index, so it is linked into our list
        unsafe {
            self.list.move_to_front(node);
            Some(&mut (*node).get_value_mut().1)
        }
    }

    /// Looks up `key` without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        // SAFETY: node comes from our index, so it is linked into our list
        unsafe { Some(&(*node).get_value().1) }
    }

    /// Returns `true` if `key` is present. Does not touch recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// The entry that the next eviction would remove.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.list.back().map(|(k, v)| (k, v))
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node was in our index until the line above, so it is still linked
        let (_, value) = unsafe { self.list.remove(node) };
        self.debug_check();
        Some(value)
    }

    /// Evicts the least recently used entry. An empty store is a no-op.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.remove_last()?;
        self.map.remove(&key);
        trace!(len = self.map.len(), "evicted least recently used entry");
        self.debug_check();
        Some((key, value))
    }

    /// Drops every entry. The capacity is kept.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(self.map.len(), self.list.len());
        debug_assert!(self.map.len() <= self.cap().get());
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or updates `key` and makes it the most recently used entry.
    ///
    /// # Returns
    ///
    /// - `Some((key, old_value))` if `key` was already present and got overwritten
    /// - `Some((evicted_key, evicted_value))` if a new key pushed out the oldest entry
    /// - `None` if a new key fit without eviction
    pub fn add(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our index, so it is linked into our list
            let replaced = unsafe {
                self.list.move_to_front(node);
                mem::replace((*node).get_value_mut(), (key, value))
            };
            return Some(replaced);
        }

        let evicted = if self.map.len() >= self.cap().get() {
            self.remove_oldest()
        } else {
            None
        };

        let node = self.list.push_front((key.clone(), value));
        self.map.insert(key, node);
        self.debug_check();
        evicted
    }
}

impl<K, V, S> core::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}
