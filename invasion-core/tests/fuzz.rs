//! Long randomised runs sampling the invariant checker.
//!
//! Set `INVASION_FUZZ_SEED` to replay a failing run.

use std::time::{SystemTime, UNIX_EPOCH};

use invasion_core::{InvasionBuilder, generate_map, verify_invariants};
use invasion_test_support::profile::FuzzProfile;
use rand::{Rng, SeedableRng, rngs::SmallRng};

const SAMPLE_PERIOD: usize = 100;
const RUNS: u64 = 4;

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn fuzz_once(seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let cities = rng.gen_range(0..2_000);
    let routes = rng.gen_range(0..2_000);
    let aliens = rng.gen_range(0..100);
    let max_moves = rng.gen_range(0..2_000);

    let graph = generate_map(&mut rng, cities, routes);
    verify_invariants(&graph, []).unwrap_or_else(|err| panic!("seed {seed}: generated map: {err}"));

    let mut invasion = InvasionBuilder::new()
        .with_aliens(aliens)
        .with_max_moves(max_moves)
        .build(graph, rng);
    let mut turn = 0_usize;
    while invasion.is_valid() {
        invasion.advance();
        if turn % SAMPLE_PERIOD == 0 {
            invasion
                .invariants()
                .check_all()
                .unwrap_or_else(|err| panic!("seed {seed}: turn {turn}: {err}"));
        }
        turn += 1;
    }
    invasion
        .invariants()
        .check_all()
        .unwrap_or_else(|err| panic!("seed {seed}: final state: {err}"));
    assert!(
        invasion.graph().is_empty() || invasion.aliens().all(|alien| alien.moves() >= max_moves),
        "seed {seed}: stopped with budget left"
    );
}

#[test]
fn fuzz_invasion_keeps_invariants() {
    let base = FuzzProfile::load(1, clock_seed()).seed();
    for offset in 0..RUNS {
        fuzz_once(base.wrapping_add(offset));
    }
}
