//! Configuration for the Least Recently Used (LRU) store.
//!
//! # Sizing
//!
//! `capacity` is the only limit: the maximum number of entries the store keeps
//! before it starts evicting. Every entry costs roughly two pointers of list
//! linkage, one index slot and a second copy of the key on top of the key and
//! value themselves.
//!
//! ```text
//! Total Memory ≈ capacity × (2 × size_of::<K>() + size_of::<V>() + overhead)
//! overhead ≈ 32-48 bytes (list links, hash slot, allocation header)
//! ```
//!
//! # Examples
//!
//! ```
//! use serial_lru::config::LruCacheConfig;
//! use serial_lru::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(10_000).unwrap(),
//! };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 10_000);
//! ```

use crate::error::{CacheError, Result};
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU store.
///
/// Zero capacity is unrepresentable: the field is a [`NonZeroUsize`]. Use
/// [`LruCacheConfig::try_from_capacity`] when the capacity comes from an
/// unchecked `usize`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the store can hold.
    pub capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Creates a configuration for `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// Creates a configuration from a plain count, rejecting zero.
    pub fn try_from_capacity(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(CacheError::ZeroCapacity)
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
