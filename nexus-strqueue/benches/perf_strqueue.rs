//! Benchmarks for StrQueue push/pop, reverse and sort.
//!
//! Run with: cargo bench -p nexus-strqueue

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nexus_strqueue::StrQueue;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const PAYLOAD: &[u8] = b"ORDER-000042:BUY:100@101.25";

fn random_values(len: usize) -> Vec<Vec<u8>> {
    let mut rng = SmallRng::seed_from_u64(len as u64);
    (0..len)
        .map(|_| {
            let n = rng.random_range(4..24);
            (0..n).map(|_| rng.random_range(b'a'..=b'z')).collect()
        })
        .collect()
}

fn filled(values: &[Vec<u8>]) -> StrQueue {
    let mut queue = StrQueue::try_with_capacity(values.len()).unwrap();
    for v in values {
        queue.try_push_back(v).unwrap();
    }
    queue
}

// ============================================================================
// Push / pop
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    group.bench_function("push_back+pop_front", |b| {
        let mut queue = StrQueue::try_with_capacity(1024).unwrap();
        b.iter(|| {
            queue.try_push_back(black_box(PAYLOAD)).unwrap();
            black_box(queue.pop_front(None).unwrap())
        });
    });

    group.bench_function("push_front+pop_front_into", |b| {
        let mut queue = StrQueue::try_with_capacity(1024).unwrap();
        let mut buf = [0u8; 64];
        b.iter(|| {
            queue.try_push_front(black_box(PAYLOAD)).unwrap();
            black_box(queue.pop_front_into(&mut buf).unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Reorder
// ============================================================================

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder");

    for len in [100usize, 1_000, 10_000] {
        let values = random_values(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("reverse", len), &values, |b, values| {
            let mut queue = filled(values);
            b.iter(|| queue.reverse());
        });

        group.bench_with_input(BenchmarkId::new("sort", len), &values, |b, values| {
            b.iter_batched(
                || filled(values),
                |mut queue| {
                    queue.sort();
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_reorder);
criterion_main!(benches);
