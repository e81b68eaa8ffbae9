//! Dispatcher-Backed LRU Cache
//!
//! [`SerializedLruCache`] owns an [`LruCache`] that lives on one dedicated
//! thread. Public calls turn into requests that travel through a
//! `crossbeam` channel; the dispatcher applies them one at a time and answers
//! each on a single-use reply channel the caller is blocked on.
//!
//! # Lifecycle
//!
//! The dispatcher is spawned by the constructor, before any call can be made,
//! and runs for as long as a handle to the cache exists. Dropping the cache
//! closes the mailbox; the dispatcher finishes the requests it already holds,
//! exits, and is joined by `Drop`. There is no explicit stop operation.
//!
//! # Failure
//!
//! The dispatcher can only die by panicking inside user code it runs on the
//! caller's behalf (`Hash`, `Eq`, `Clone` or `Drop` of a key or value). Callers
//! waiting on it, or arriving later, panic with a message naming the
//! dispatcher instead of blocking forever.

extern crate alloc;
extern crate std;

use crate::concurrent::SharedCache;
use crate::config::{LruCacheConfig, Mailbox, SerializedCacheConfig};
use crate::error::{CacheError, Result};
use crate::lru::LruCache;
use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::num::NonZeroUsize;
use crossbeam::channel::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// One unit of work for the dispatcher, carrying its arguments and the
/// sender half of the caller's reply channel.
enum Request<K, V> {
    Get { key: K, reply: Sender<Option<V>> },
    Add { key: K, value: V, reply: Sender<()> },
    Remove { key: K, reply: Sender<()> },
    RemoveOldest { reply: Sender<()> },
    Len { reply: Sender<usize> },
}

impl<K, V> Request<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn apply<S: BuildHasher>(self, store: &mut LruCache<K, V, S>) {
        // A failed reply means the caller is gone; the store change stands.
        match self {
            Request::Get { key, reply } => {
                let _ = reply.send(store.get(&key).cloned());
            }
            Request::Add { key, value, reply } => {
                store.add(key, value);
                let _ = reply.send(());
            }
            Request::Remove { key, reply } => {
                store.remove(&key);
                let _ = reply.send(());
            }
            Request::RemoveOldest { reply } => {
                store.remove_oldest();
                let _ = reply.send(());
            }
            Request::Len { reply } => {
                let _ = reply.send(store.len());
            }
        }
    }
}

fn dispatch<K, V, S>(mut store: LruCache<K, V, S>, inbox: Receiver<Request<K, V>>)
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    let mut served: u64 = 0;
    for request in inbox.iter() {
        request.apply(&mut store);
        served += 1;
    }
    debug!(served, remaining = store.len(), "lru dispatcher stopped");
}

/// A thread-safe LRU cache whose store is touched by exactly one thread.
///
/// Cloning is not supported; share it with `Arc`. Values come back as clones
/// because they cannot be borrowed across the thread boundary.
///
/// # Example
///
/// ```
/// use serial_lru::SerializedLruCache;
/// use core::num::NonZeroUsize;
/// use std::sync::Arc;
/// use std::thread;
///
/// let cache = Arc::new(SerializedLruCache::new(NonZeroUsize::new(100).unwrap()).unwrap());
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = Arc::clone(&cache);
///         thread::spawn(move || {
///             for i in 0..10 {
///                 cache.add(format!("{}-{}", t, i), i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 40);
/// assert_eq!(cache.get("3-9"), Some(9));
/// ```
pub struct SerializedLruCache<K, V, S = DefaultHashBuilder> {
    mailbox: Option<Sender<Request<K, V>>>,
    dispatcher: Option<JoinHandle<()>>,
    capacity: NonZeroUsize,
    name: String,
    _hasher: PhantomData<fn() -> S>,
}

impl<K, V> SerializedLruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Starts a dispatcher for a store of `cap` entries, with a rendezvous
    /// mailbox and the default thread name.
    pub fn new(cap: NonZeroUsize) -> Result<Self> {
        Self::init(SerializedCacheConfig::new(cap), None)
    }

    /// Like [`new`](Self::new) for an unchecked count.
    ///
    /// Returns [`CacheError::ZeroCapacity`] for `0`; no thread is started in
    /// that case.
    pub fn try_new(cap: usize) -> Result<Self> {
        let base = LruCacheConfig::try_from_capacity(cap)?;
        Self::new(base.capacity)
    }

    /// Starts a dispatcher from a full configuration and optional hasher.
    pub fn init(
        config: SerializedCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> SerializedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
    S: BuildHasher + Send + 'static,
{
    /// Starts a dispatcher whose store uses a custom hash builder.
    pub fn init_with_hasher(config: SerializedCacheConfig, hash_builder: S) -> Result<Self> {
        let store = LruCache::with_hasher(config.base.capacity, hash_builder);
        Self::launch(store, config.mailbox, config.dispatcher_name())
    }

    /// Moves an existing store onto a new dispatcher thread.
    ///
    /// Entries and recency order are kept. Ownership of the store passes to the
    /// dispatcher, so nothing else can reach it afterwards.
    pub fn from_store(store: LruCache<K, V, S>) -> Result<Self> {
        Self::launch(
            store,
            Mailbox::default(),
            crate::config::DEFAULT_DISPATCHER_NAME,
        )
    }

    fn launch(store: LruCache<K, V, S>, mailbox: Mailbox, name: &str) -> Result<Self> {
        let (sender, inbox) = match mailbox {
            Mailbox::Rendezvous => channel::bounded(0),
            Mailbox::Bounded(n) => channel::bounded(n.get()),
            Mailbox::Unbounded => channel::unbounded(),
        };
        let capacity = store.cap();

        let dispatcher = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || dispatch(store, inbox))
            .map_err(CacheError::Spawn)?;

        debug!(
            dispatcher = name,
            capacity = capacity.get(),
            ?mailbox,
            "lru dispatcher started"
        );

        Ok(Self {
            mailbox: Some(sender),
            dispatcher: Some(dispatcher),
            capacity,
            name: name.to_string(),
            _hasher: PhantomData,
        })
    }

    /// Sends one request and blocks until the dispatcher has answered it.
    fn call<R>(&self, build: impl FnOnce(Sender<R>) -> Request<K, V>) -> R {
        let (reply, response) = channel::bounded(1);
        if let Some(mailbox) = &self.mailbox {
            if mailbox.send(build(reply)).is_ok() {
                if let Ok(value) = response.recv() {
                    return value;
                }
            }
        }
        error!(dispatcher = %self.name, "lru dispatcher is gone, request cannot complete");
        panic!("lru dispatcher thread `{}` terminated", self.name);
    }

    /// Inserts or updates `key` and marks it most recently used.
    ///
    /// Returns once the change is committed. If the key is new and the cache
    /// is full, the least recently used entry is evicted first.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher thread has terminated.
    pub fn add(&self, key: K, value: V) {
        self.call(|reply| Request::Add { key, value, reply })
    }

    /// Looks up `key` and returns a clone of its value, promoting it on a hit.
    ///
    /// Accepts any borrowed form of the key; the owned key is what travels to
    /// the dispatcher.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher thread has terminated.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + ToOwned<Owned = K>,
    {
        let key = key.to_owned();
        self.call(|reply| Request::Get { key, reply })
    }

    /// Deletes `key`. Absent keys are a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher thread has terminated.
    pub fn remove<Q>(&self, key: &Q)
    where
        Q: ?Sized + ToOwned<Owned = K>,
    {
        let key = key.to_owned();
        self.call(|reply| Request::Remove { key, reply })
    }

    /// Evicts the least recently used entry. Empty caches are a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher thread has terminated.
    pub fn remove_oldest(&self) {
        self.call(|reply| Request::RemoveOldest { reply })
    }

    /// Number of entries, read on the dispatcher so that it reflects every
    /// request committed before it.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher thread has terminated.
    pub fn len(&self) -> usize {
        self.call(|reply| Request::Len { reply })
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries. Fixed at construction, answered locally.
    pub fn cap(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Name of the dispatcher thread.
    pub fn dispatcher_name(&self) -> &str {
        &self.name
    }
}

impl<K, V, S> SharedCache<K, V> for SerializedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
    S: BuildHasher + Send + 'static,
{
    fn add(&self, key: K, value: V) {
        SerializedLruCache::add(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        SerializedLruCache::get(self, key)
    }

    fn remove(&self, key: &K) {
        SerializedLruCache::remove(self, key)
    }

    fn remove_oldest(&self) {
        SerializedLruCache::remove_oldest(self)
    }

    fn len(&self) -> usize {
        SerializedLruCache::len(self)
    }
}

impl<K, V, S> Drop for SerializedLruCache<K, V, S> {
    fn drop(&mut self) {
        // Closing the mailbox is what ends the dispatcher loop.
        drop(self.mailbox.take());
        if let Some(dispatcher) = self.dispatcher.take() {
            if dispatcher.join().is_err() {
                error!(dispatcher = %self.name, "lru dispatcher panicked");
            }
        }
    }
}

impl<K, V, S> core::fmt::Debug for SerializedLruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerializedLruCache")
            .field("dispatcher", &self.name)
            .field("capacity", &self.capacity)
            .finish()
    }
}
