//! Error types for cache construction.
//!
//! Cache operations themselves never fail: misses and no-op removals are
//! ordinary results. Only building a cache can go wrong.

use thiserror::Error;

/// Result type alias using [`CacheError`].
pub type Result<T> = core::result::Result<T, CacheError>;

/// Errors that can occur while constructing a cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A capacity of zero was requested.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    /// The operating system refused to start the dispatcher thread.
    #[cfg(feature = "concurrent")]
    #[error("failed to spawn dispatcher thread: {0}")]
    Spawn(#[source] std::io::Error),
}
