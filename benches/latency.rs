//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - Insert at the tail (fresh key)
//! - Key lookup at varying map sizes
//! - Ordinal access at varying depths
//! - Erase + replenish
//! - Mixed workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chain_map::{Command, Engine, OrderedMap};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn filled_map(size: u64) -> OrderedMap<u64, u64> {
    (0..size).map(|i| (i, i)).collect()
}

/// Generate a random command over a bounded key space
fn random_command(rng: &mut ChaCha8Rng, key_space: u64) -> Command<u64, u64> {
    let key = rng.gen_range(0..key_space);
    match rng.gen_range(0..10) {
        0..=3 => Command::InsertOrUpdate { key, value: key },
        4..=5 => Command::Erase { key },
        6..=8 => Command::Get { key },
        _ => Command::GetIndex {
            index: rng.gen_range(0..key_space as usize),
        },
    }
}

/// Benchmark: Insert a fresh key into maps of varying size
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_fresh");

    for size in [10u64, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut map = filled_map(size);
            let key = size + 1;

            b.iter(|| {
                // Insert scans for duplicates first, then appends
                let inserted = map.insert(black_box(key), 0);
                map.erase(&key);
                black_box(inserted)
            })
        });
    }

    group.finish();
}

/// Benchmark: Key lookup (linear scan)
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [10u64, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let map = filled_map(size);
            let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);

            b.iter(|| {
                let key = rng.gen_range(0..size);
                black_box(map.get(&key))
            })
        });
    }

    group.finish();
}

/// Benchmark: Ordinal access (walk from head)
fn bench_get_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_index");

    for depth in [0usize, 10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let map = filled_map(1_001);
            b.iter(|| black_box(map.get_index(black_box(depth))))
        });
    }

    group.finish();
}

/// Benchmark: Erase the oldest entry and re-append it
fn bench_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase");

    for size in [10u64, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut map = filled_map(size);
            let mut oldest = 0u64;

            b.iter(|| {
                let result = map.erase(&oldest);
                // Replenish
                map.insert(oldest, oldest);
                oldest = (oldest + 1) % size;
                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark: Mixed workload through the engine
fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    group.bench_function("keys_256", |b| {
        let mut engine = Engine::with_capacity(256);
        let mut rng = ChaCha8Rng::seed_from_u64(0xCAFEBABE);

        // Pre-populate
        for _ in 0..1_000 {
            engine.process_command(random_command(&mut rng, 256));
        }

        b.iter(|| black_box(engine.process_command(random_command(&mut rng, 256))))
    });

    group.finish();
}

/// Benchmark: Clone (fresh nodes for every entry)
fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");
    group.throughput(criterion::Throughput::Elements(1_000));

    group.bench_function("1000_entries", |b| {
        let map = filled_map(1_000);
        b.iter(|| black_box(map.clone()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_get,
    bench_get_index,
    bench_erase,
    bench_mixed_workload,
    bench_clone,
);

criterion_main!(benches);
