//! Benchmarks for the in-memory feedback chain.
//!
//! Benchmark targets:
//! - Append: O(1) regardless of chain length
//! - Point lookup: linear walk from the head
//! - Removal: constant once the walk finds the slot
//! - Full scan: linear in live records

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use voxpop::chain::FeedbackChain;
use voxpop::{FeedbackId, FeedbackRecord};

const RATINGS: [i64; 5] = [1, 2, 3, 4, 5];

fn record(n: usize) -> FeedbackRecord {
    FeedbackRecord {
        id: FeedbackId::from(format!("F{n}")),
        customer: format!("customer {n}"),
        text: "benchmark feedback entry".to_string(),
        rating: RATINGS[n % RATINGS.len()],
    }
}

fn chain_of(len: usize) -> FeedbackChain {
    let mut chain = FeedbackChain::new();
    for n in 0..len {
        chain.push_back(record(n));
    }
    chain
}

// ============================================================================
// Append Benchmarks
// ============================================================================

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_append");

    // Test how appending scales with chain length
    for count in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("push_back", count), &count, |b, &count| {
            b.iter(|| {
                let mut chain = FeedbackChain::new();
                for n in 0..count {
                    chain.push_back(black_box(record(n)));
                }
                chain
            });
        });
    }

    // Appending into a freed slot should cost the same as a fresh append
    group.bench_function("push_back_reused_slot", |b| {
        b.iter_batched(
            || {
                let mut chain = chain_of(1_000);
                chain.remove("F500");
                chain
            },
            |mut chain| {
                chain.push_back(black_box(record(1_001)));
                chain
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_lookup");
    let chain = chain_of(1_000);

    // Lookup cost depends on the record's position in the chain
    let positions = [("front", "F0"), ("middle", "F500"), ("back", "F999")];
    for (name, id) in positions {
        group.bench_with_input(BenchmarkId::new("find", name), &id, |b, id| {
            b.iter(|| chain.find(black_box(id)));
        });
    }

    // A miss walks the whole chain
    group.bench_function("find_missing", |b| {
        b.iter(|| chain.find(black_box("absent")));
    });

    group.bench_function("contains_hit", |b| {
        b.iter(|| chain.contains(black_box("F250")));
    });

    group.finish();
}

// ============================================================================
// Removal Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_remove");

    let positions = [("front", "F0"), ("middle", "F500"), ("back", "F999")];
    for (name, id) in positions {
        group.bench_with_input(BenchmarkId::new("remove", name), &id, |b, id| {
            b.iter_batched(
                || chain_of(1_000),
                |mut chain| {
                    chain.remove(black_box(id));
                    chain
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Scan Benchmarks
// ============================================================================

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_scan");

    for count in [100usize, 1_000, 10_000] {
        let chain = chain_of(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("sum_ratings", count), &chain, |b, chain| {
            b.iter(|| chain.iter().map(|r| black_box(r.rating)).sum::<i64>());
        });

        group.bench_with_input(BenchmarkId::new("reverse_walk", count), &chain, |b, chain| {
            b.iter(|| chain.iter().rev().map(|r| black_box(r.rating)).sum::<i64>());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_lookup, bench_remove, bench_scan);

criterion_main!(benches);
