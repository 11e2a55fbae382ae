//! # Loader Benchmarks
//!
//! Performance benchmarks for specification loading.
//!
//! Run with: `cargo bench -p facetwork-core`

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use facetwork_core::{
    ClassDescriptor, ClassRegistry, MetaModelContext, MethodDescriptor, TypeName, TypeRef,
};
use std::hint::black_box;

/// `size` independent types, each with a few properties, a collection
/// pointing at the next type, and one action.
fn create_registry(size: usize) -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    for i in 0..size {
        let next = format!("bench.Type{}", (i + 1) % size);
        let class = ClassDescriptor::new(format!("bench.Type{i}"))
            .method(MethodDescriptor::new("getName").returns(TypeRef::text()))
            .method(MethodDescriptor::new("getCount").returns(TypeRef::int()))
            .method(MethodDescriptor::new("isActive").returns(TypeRef::boolean()))
            .method(MethodDescriptor::new("getPeers").returns(TypeRef::list(TypeRef::class(next))))
            .method(MethodDescriptor::new("choicesName").returns(TypeRef::list(TypeRef::text())))
            .method(
                MethodDescriptor::new("rename")
                    .param(TypeRef::text())
                    .returns(TypeRef::text()),
            );
        registry.register(class).expect("register");
    }
    registry
}

/// Supertype chain of `depth` types.
fn create_chain(depth: usize) -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    for level in 0..depth {
        let mut class = ClassDescriptor::new(format!("bench.Level{level}"))
            .method(MethodDescriptor::new(format!("getField{level}")).returns(TypeRef::text()));
        if level > 0 {
            class = class.extends(format!("bench.Level{}", level - 1));
        }
        registry.register(class).expect("register");
    }
    registry
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_prime(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime");

    for size in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || MetaModelContext::builder(create_registry(size)).build(),
                |ctx| black_box(ctx.prime().expect("prime")),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_deep_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_hierarchy");

    for depth in [8, 32, 128].iter() {
        let leaf = TypeName::new(format!("bench.Level{}", depth - 1));
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter_batched(
                || MetaModelContext::builder(create_chain(depth)).build(),
                |ctx| black_box(ctx.specification(&leaf)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_cached_lookup(c: &mut Criterion) {
    let ctx = MetaModelContext::builder(create_registry(100)).build();
    ctx.prime().expect("prime");
    let name = TypeName::new("bench.Type42");

    c.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(ctx.specification(black_box(&name))));
    });
}

criterion_group!(benches, bench_prime, bench_deep_hierarchy, bench_cached_lookup);
criterion_main!(benches);
