//! Combine/subtract benchmarks.
//!
//! Both functions are quadratic in map size, so the groups sweep size
//! and overlap to show where that starts to bite.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chain_map::{combine, subtract, OrderedMap};

/// Two maps of `size` entries sharing `overlap` percent of their keys
fn overlapping_maps(size: u64, overlap: u64) -> (OrderedMap<u64, u64>, OrderedMap<u64, u64>) {
    let shift = size - size * overlap / 100;
    let m1 = (0..size).map(|i| (i, i)).collect();
    let m2 = (shift..shift + size).map(|i| (i, i)).collect();
    (m1, m2)
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    for size in [10u64, 100, 500].iter() {
        for overlap in [0u64, 50, 100].iter() {
            let (m1, m2) = overlapping_maps(*size, *overlap);
            group.throughput(Throughput::Elements(size * 2));
            group.bench_with_input(
                BenchmarkId::new(format!("overlap_{}", overlap), size),
                &(m1, m2),
                |b, (m1, m2)| b.iter(|| black_box(combine(m1, m2))),
            );
        }
    }

    group.finish();
}

fn bench_subtract(c: &mut Criterion) {
    let mut group = c.benchmark_group("subtract");

    for size in [10u64, 100, 500].iter() {
        let (m1, m2) = overlapping_maps(*size, 50);
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(m1, m2), |b, (m1, m2)| {
            b.iter(|| black_box(subtract(m1, m2)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_combine, bench_subtract);
criterion_main!(benches);
