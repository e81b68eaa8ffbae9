//! Cache Configuration Module
//!
//! Configuration structures for the sequential store and the concurrent front
//! ends. Configuration structs have public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: Zero capacity cannot be expressed
//! - **No boilerplate**: Small `new` helpers exist, builders do not
//!
//! | Config | Used by | Description |
//! |--------|---------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Sequential LRU store |
//! | `SerializedCacheConfig` | `SerializedLruCache` | Dispatcher-backed front end (requires `concurrent`) |
//!
//! `LockedLruCache` needs nothing beyond an `LruCacheConfig`.
//!
//! # Examples
//!
//! ```
//! use serial_lru::config::LruCacheConfig;
//! use serial_lru::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! assert!(cache.is_empty());
//! ```

pub mod lru;

pub use lru::LruCacheConfig;

#[cfg(feature = "concurrent")]
use alloc::string::String;
#[cfg(feature = "concurrent")]
use core::num::NonZeroUsize;

/// Name given to dispatcher threads when the config does not set one.
#[cfg(feature = "concurrent")]
pub const DEFAULT_DISPATCHER_NAME: &str = "serial-lru-dispatch";

/// Buffering of the channel that carries requests to the dispatcher thread.
///
/// Every caller waits for its own reply regardless of this setting, so the
/// mailbox never changes what a caller observes. It only changes whether a
/// sender can hand off its request before the dispatcher is ready to take it.
#[cfg(feature = "concurrent")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mailbox {
    /// Zero-capacity channel: a send completes only when the dispatcher receives it.
    #[default]
    Rendezvous,
    /// Channel holding up to `n` pending requests.
    Bounded(NonZeroUsize),
    /// Channel with no bound on pending requests.
    Unbounded,
}

/// Configuration for a [`SerializedLruCache`](crate::SerializedLruCache).
///
/// # Example
///
/// ```
/// use serial_lru::config::{LruCacheConfig, Mailbox, SerializedCacheConfig};
/// use core::num::NonZeroUsize;
///
/// let config = SerializedCacheConfig {
///     base: LruCacheConfig::new(NonZeroUsize::new(10_000).unwrap()),
///     mailbox: Mailbox::Bounded(NonZeroUsize::new(64).unwrap()),
///     thread_name: Some("session-cache".to_string()),
/// };
/// assert_eq!(config.dispatcher_name(), "session-cache");
/// ```
#[cfg(feature = "concurrent")]
#[derive(Clone, PartialEq, Eq)]
pub struct SerializedCacheConfig {
    /// Configuration of the store owned by the dispatcher thread.
    pub base: LruCacheConfig,
    /// Buffering of the request channel.
    pub mailbox: Mailbox,
    /// Name of the dispatcher thread. `None` uses [`DEFAULT_DISPATCHER_NAME`].
    pub thread_name: Option<String>,
}

#[cfg(feature = "concurrent")]
impl SerializedCacheConfig {
    /// Rendezvous mailbox, default thread name.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            base: LruCacheConfig::new(capacity),
            mailbox: Mailbox::default(),
            thread_name: None,
        }
    }

    /// The name the dispatcher thread will be spawned with.
    pub fn dispatcher_name(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(DEFAULT_DISPATCHER_NAME)
    }
}

#[cfg(feature = "concurrent")]
impl core::fmt::Debug for SerializedCacheConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerializedCacheConfig")
            .field("base", &self.base)
            .field("mailbox", &self.mailbox)
            .field("thread_name", &self.dispatcher_name())
            .finish()
    }
}
