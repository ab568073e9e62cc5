//! Full invasion run benchmarks.
//!
//! Each iteration clones a pre-generated map so only the simulation itself is
//! measured; events go to a discarding sink.
use std::io;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use invasion_benches::{
    params::{InvasionBenchParams, MapBenchParams},
    seeded_map,
};
use invasion_core::InvasionBuilder;

const MAP_SEED: u64 = 42;
const RUN_SEED: u64 = 1_337;

const RUNS: &[InvasionBenchParams] = &[
    InvasionBenchParams {
        map: MapBenchParams {
            cities: 100,
            routes: 50,
        },
        aliens: 10,
        max_moves: 10_000,
    },
    InvasionBenchParams {
        map: MapBenchParams {
            cities: 1_000,
            routes: 1_200,
        },
        aliens: 100,
        max_moves: 1_000,
    },
    InvasionBenchParams {
        map: MapBenchParams {
            cities: 10_000,
            routes: 12_000,
        },
        aliens: 100,
        max_moves: 1_000,
    },
];

fn invasion_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("invasion_run");
    group.sample_size(10);

    for params in RUNS {
        let graph = seeded_map(&params.map, MAP_SEED);
        group.bench_with_input(BenchmarkId::from_parameter(params), params, |b, params| {
            b.iter_batched(
                || graph.clone(),
                |graph| {
                    InvasionBuilder::new()
                        .with_aliens(params.aliens)
                        .with_max_moves(params.max_moves)
                        .build(graph, SmallRng::seed_from_u64(RUN_SEED))
                        .run(io::sink())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, invasion_run);
criterion_main!(benches);
