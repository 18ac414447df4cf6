//! Benchmarks for token registration and resolution.
//!
//! Run with: cargo bench -p vize_pigment
//!
//! Collections follow the usual theme shape: each category has a literal
//! `primary`, a `secondary` aliasing it and a `tertiary` aliasing the
//! previous category's `primary`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vize_pigment::{create_store, Token, TokenCollection, TokenStore};

// =============================================================================
// Test Data
// =============================================================================

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn collection(count: usize) -> TokenCollection {
    let mut tokens = TokenCollection::new();
    for i in 0..count {
        let previous = i.saturating_sub(1);
        tokens
            .insert(&format!("category{i}.primary"), Token::new(format!("#{:06x}", i)))
            .unwrap();
        tokens
            .insert(
                &format!("category{i}.secondary"),
                Token::new(format!("{{category{i}.primary}}")),
            )
            .unwrap();
        tokens
            .insert(
                &format!("category{i}.tertiary"),
                Token::new(format!("{{category{previous}.primary}}")),
            )
            .unwrap();
    }
    tokens
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64 * 3));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(collection(size)))
        });
    }

    group.finish();
}

fn bench_resolve_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_cold");

    for size in SIZES {
        let tokens = collection(size);
        let last = format!("category{}.tertiary", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &last, |b, last| {
            b.iter_batched(
                || create_store(tokens.clone()),
                |store: TokenStore| black_box(store.resolve(last).unwrap()),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_resolve_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_cached_x100");

    for size in SIZES {
        let store = create_store(collection(size));
        let path = format!("category{}.secondary", size / 2);
        store.resolve(&path).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &path, |b, path| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(store.resolve(black_box(path)).unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_resolve_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");
    group.sample_size(20);

    for size in SIZES {
        let tokens = collection(size);
        group.throughput(Throughput::Elements(size as u64 * 3));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tokens, |b, tokens| {
            b.iter_batched(
                || create_store(tokens.clone()),
                |store: TokenStore| black_box(store.resolve_all()),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_register_override(c: &mut Criterion) {
    let mut store = create_store(collection(1_000));
    let mut n = 0u32;

    c.bench_function("register_then_resolve", |b| {
        b.iter(|| {
            n = n.wrapping_add(1);
            store
                .register("category500.primary", format!("#{:06x}", n))
                .unwrap();
            black_box(store.resolve("category501.tertiary").unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_resolve_cold,
    bench_resolve_cached,
    bench_resolve_all,
    bench_register_override,
);
criterion_main!(benches);
