//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage patterns for the serial-lru
//! thread-safe caches.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent
//!
//! Set `RUST_LOG=serial_lru=trace` to see dispatcher lifecycle and eviction
//! events.

extern crate serial_lru;

use serial_lru::config::{LruCacheConfig, Mailbox, SerializedCacheConfig};
use serial_lru::{LockedLruCache, SerializedLruCache, SharedCache};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn serialized_config(capacity: usize, mailbox: Mailbox, name: &str) -> SerializedCacheConfig {
    SerializedCacheConfig {
        base: LruCacheConfig {
            capacity: NonZeroUsize::new(capacity).unwrap(),
        },
        mailbox,
        thread_name: Some(name.to_string()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage();
    println!();

    recency_across_threads();
    println!();

    zero_copy_get_with();
    println!();

    mailbox_tuning();
    println!();

    throughput_comparison();
}

/// Basic multi-threaded cache usage
fn basic_concurrent_usage() {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let cache: Arc<SerializedLruCache<String, usize>> = Arc::new(
        SerializedLruCache::init(serialized_config(1000, Mailbox::Rendezvous, "basic"), None)
            .expect("failed to start dispatcher"),
    );

    let num_threads = 4;
    let ops_per_thread = 1000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread{}-key{}", thread_id, i);
                    let value = thread_id * 10000 + i;

                    cache.add(key.clone(), value);

                    // nobody else writes this key; it can only be gone if evicted
                    if let Some(v) = cache.get(&key) {
                        assert_eq!(v, value);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    println!(
        "   Completed {} operations across {} threads",
        num_threads * ops_per_thread * 2,
        num_threads
    );
    println!(
        "   Final cache size: {} items (capacity {})",
        cache.len(),
        cache.cap()
    );
    println!("   Dispatcher thread: {}", cache.dispatcher_name());
}

/// The recency order is shared: a read on one thread protects a key from
/// eviction caused by another thread.
fn recency_across_threads() {
    println!("2. One Recency Order for All Threads");
    println!("   ----------------------------------");

    let cache = Arc::new(
        SerializedLruCache::new(NonZeroUsize::new(2).unwrap()).expect("failed to start dispatcher"),
    );
    cache.add("A", 1);
    cache.add("B", 2);

    {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.get(&"A"))
            .join()
            .expect("Thread panicked");
    }
    {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.add("C", 3))
            .join()
            .expect("Thread panicked");
    }

    println!("   get(A) on one thread, add(C) on another");
    println!("   A -> {:?}", cache.get(&"A"));
    println!("   B -> {:?} (evicted)", cache.get(&"B"));
    println!("   C -> {:?}", cache.get(&"C"));
}

/// Zero-copy access pattern using get_with() on the mutex-backed cache
fn zero_copy_get_with() {
    println!("3. Zero-Copy Access with get_with()");
    println!("   ----------------------------------");

    let cache: LockedLruCache<String, Vec<u8>> =
        LockedLruCache::new(NonZeroUsize::new(100).unwrap());

    cache.add("large_key".to_string(), vec![1u8; 1024]);

    let sum: Option<u64> = cache.get_with("large_key", |data| {
        data.iter().map(|&x| x as u64).sum()
    });

    println!("   Stored 1KB of data in cache");
    println!(
        "   Computed sum without cloning: {}",
        sum.unwrap_or_default()
    );
    println!("   SerializedLruCache always returns clones: the value lives on another thread");
}

/// Demonstrate the mailbox flavours of the dispatcher
fn mailbox_tuning() {
    println!("4. Mailbox Tuning");
    println!("   ---------------");

    for (label, mailbox) in [
        ("rendezvous", Mailbox::Rendezvous),
        ("bounded(64)", Mailbox::Bounded(NonZeroUsize::new(64).unwrap())),
        ("unbounded", Mailbox::Unbounded),
    ] {
        let cache: SerializedLruCache<usize, usize> =
            SerializedLruCache::init(serialized_config(100, mailbox, label), None)
                .expect("failed to start dispatcher");
        for i in 0..150 {
            cache.add(i, i);
        }
        println!("   {:<12} -> {} items after 150 adds", label, cache.len());
    }

    println!();
    println!("   Every call waits for its own reply, so the mailbox never");
    println!("   changes results. A buffered mailbox lets senders hand off");
    println!("   requests while the dispatcher is busy.");
}

fn run_workload<C>(cache: Arc<C>, num_threads: usize, ops_per_thread: usize)
where
    C: SharedCache<usize, usize> + Send + Sync + 'static,
{
    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = (t * ops_per_thread + i) % 5000;
                    if i % 5 == 0 {
                        cache.add(key, i);
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

/// Rough throughput comparison of the two thread-safe caches
fn throughput_comparison() {
    println!("5. Throughput Comparison");
    println!("   ----------------------");

    let num_threads = 8;
    let ops_per_thread = 10_000;
    let total = (num_threads * ops_per_thread) as f64;

    let serialized: Arc<SerializedLruCache<usize, usize>> = Arc::new(
        SerializedLruCache::init(
            serialized_config(10_000, Mailbox::Unbounded, "throughput"),
            None,
        )
        .expect("failed to start dispatcher"),
    );
    let start = Instant::now();
    run_workload(Arc::clone(&serialized), num_threads, ops_per_thread);
    let elapsed = start.elapsed();
    println!(
        "   SerializedLruCache: {:>10.0} ops/sec",
        total / elapsed.as_secs_f64()
    );

    let locked: Arc<LockedLruCache<usize, usize>> =
        Arc::new(LockedLruCache::new(NonZeroUsize::new(10_000).unwrap()));
    let start = Instant::now();
    run_workload(Arc::clone(&locked), num_threads, ops_per_thread);
    let elapsed = start.elapsed();
    println!(
        "   LockedLruCache:     {:>10.0} ops/sec",
        total / elapsed.as_secs_f64()
    );
}
