// benches/cache_organizations_benchmarks.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cachesim::trace::{generate_addresses, AccessPattern, WorkloadConfig};
use cachesim::{CacheGeometry, CacheModel, Organization, ReplacementPolicy};
use std::time::Duration;

/// Trace synthétique commune aux benchmarks
fn create_workload(pattern: AccessPattern, length: usize) -> Vec<u32> {
    generate_addresses(&WorkloadConfig {
        length,
        pattern,
        block_size: 4,
        num_sets: 64,
        working_set_blocks: 1024,
        seed: 0xCAFE,
    })
}

/// Benchmark principal: les trois organisations sur un cache de 1KB
fn bench_organizations(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_organizations_1KB");
    group.measurement_time(Duration::from_secs(5));

    let trace = create_workload(AccessPattern::Random, 50_000);

    let configs = vec![
        ("FullyAssociative", CacheGeometry::fully_associative(256, 4), Organization::FullyAssociative),
        ("DirectMapped", CacheGeometry::direct_mapped(256, 4), Organization::DirectMapped),
        ("SetAssociative_4way", CacheGeometry::set_associative(64, 4, 4), Organization::SetAssociative),
    ];

    for (name, geometry, organization) in &configs {
        for policy in [ReplacementPolicy::LRU, ReplacementPolicy::FIFO] {
            group.bench_with_input(
                BenchmarkId::new(*name, policy.to_string()),
                &trace,
                |b, trace| {
                    let mut model = CacheModel::new(*geometry).unwrap();
                    b.iter(|| {
                        let stats = model.simulate(trace, *organization, Some(policy)).unwrap();
                        black_box(stats)
                    })
                },
            );
        }
    }

    group.finish();
}

/// Benchmark: coût du scan LRU quand l'associativité augmente
fn bench_associativity_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_associativity_scaling");
    group.measurement_time(Duration::from_secs(5));

    let trace = create_workload(AccessPattern::ConflictHeavy, 20_000);

    for ways in [2usize, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::new("lru", ways), &ways, |b, &ways| {
            let mut model = CacheModel::new(CacheGeometry::set_associative(64, ways, 4)).unwrap();
            b.iter(|| {
                let stats = model
                    .simulate(&trace, Organization::SetAssociative, Some(ReplacementPolicy::LRU))
                    .unwrap();
                black_box(stats)
            })
        });
    }

    group.finish();
}

criterion_group!(
    organization_benches,
    bench_organizations,
    bench_associativity_scaling
);

criterion_main!(organization_benches);
