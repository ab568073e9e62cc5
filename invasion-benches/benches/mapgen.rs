//! Random map generation benchmarks.
//!
//! Measures `generate_map` across map sizes, including a dense request that
//! drives most cities to the four-route cap.
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use invasion_benches::params::MapBenchParams;
use invasion_core::generate_map;

/// Seed used for every generated map in this benchmark.
const SEED: u64 = 42;

const SIZES: &[MapBenchParams] = &[
    MapBenchParams {
        cities: 100,
        routes: 50,
    },
    MapBenchParams {
        cities: 1_000,
        routes: 1_200,
    },
    MapBenchParams {
        cities: 1_000,
        routes: 1_900,
    },
    MapBenchParams {
        cities: 10_000,
        routes: 12_000,
    },
];

fn mapgen(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_map");
    group.sample_size(20);

    for params in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(params), params, |b, params| {
            b.iter(|| {
                generate_map(
                    &mut SmallRng::seed_from_u64(SEED),
                    params.cities,
                    params.routes,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, mapgen);
criterion_main!(benches);
