//! Benchmark comparing the single-lock store with the sharded store.
//!
//! Two workloads are measured:
//! 1. Every thread adds the same key (worst case for both stores)
//! 2. Every thread adds its own spread of keys (where sharding pays off)
//!
//! Run with:
//! ```bash
//! cargo bench --bench locked_vs_sharded
//! ```

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use freqtag::store::locked::TaggedCounterStore;
use freqtag::store::sharded::ShardedTaggedCounterStore;
use freqtag::store::TagCounter;

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 100_000;
const DISTINCT_KEYS: usize = 1024;

/// Runs `NUM_THREADS` writers against a fresh store and returns its key count.
fn run<C, F>(make_key: F) -> usize
where
    C: TagCounter + Default + 'static,
    F: Fn(usize, usize) -> usize + Copy + Send + 'static,
{
    let store = Arc::new(C::default());
    let keys: Arc<Vec<String>> = Arc::new((0..DISTINCT_KEYS).map(|k| format!("line-{k}")).collect());
    let mut handles = vec![];

    for thread_id in 0..NUM_THREADS {
        let store_clone = Arc::clone(&store);
        let keys = Arc::clone(&keys);
        let handle = thread::spawn(move || {
            let tag = format!("source-{thread_id}");
            for i in 0..ITERATIONS_PER_THREAD {
                store_clone.add(&keys[make_key(thread_id, i)], &tag);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    store.len()
}

fn bench_same_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("same_key");
    let param = format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD);

    group.bench_function(BenchmarkId::new("TaggedCounterStore", &param), |b| {
        b.iter(|| black_box(run::<TaggedCounterStore, _>(|_, _| 0)))
    });

    group.bench_function(BenchmarkId::new("ShardedTaggedCounterStore", &param), |b| {
        b.iter(|| black_box(run::<ShardedTaggedCounterStore, _>(|_, _| 0)))
    });

    group.finish();
}

fn bench_spread_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("spread_keys");
    let param = format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD);
    let spread = |thread_id: usize, i: usize| (thread_id * 7919 + i) % DISTINCT_KEYS;

    group.bench_function(BenchmarkId::new("TaggedCounterStore", &param), |b| {
        b.iter(|| black_box(run::<TaggedCounterStore, _>(spread)))
    });

    group.bench_function(BenchmarkId::new("ShardedTaggedCounterStore", &param), |b| {
        b.iter(|| black_box(run::<ShardedTaggedCounterStore, _>(spread)))
    });

    group.finish();
}

criterion_group!(benches, bench_same_key, bench_spread_keys);
criterion_main!(benches);
