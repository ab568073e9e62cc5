//! Benchmark support crate for invasion.
//!
//! Provides parameter types and seeded map builders shared by the Criterion
//! benchmarks for map generation, the text codec, and full invasion runs.

pub mod params;

use invasion_core::{RoutingGraph, generate_map};
use rand::{SeedableRng, rngs::SmallRng};

use crate::params::MapBenchParams;

/// Builds the map described by `params` from a fixed seed.
///
/// # Examples
/// ```
/// use invasion_benches::{params::MapBenchParams, seeded_map};
///
/// let params = MapBenchParams { cities: 20, routes: 15 };
/// assert_eq!(seeded_map(&params, 1), seeded_map(&params, 1));
/// ```
#[must_use]
pub fn seeded_map(params: &MapBenchParams, seed: u64) -> RoutingGraph {
    generate_map(&mut SmallRng::seed_from_u64(seed), params.cities, params.routes)
}

/// Encodes the map described by `params` into its text form.
#[must_use]
pub fn encoded_map(params: &MapBenchParams, seed: u64) -> Vec<u8> {
    seeded_map(params, seed).to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(MapBenchParams { cities: 10, routes: 5 })]
    #[case(MapBenchParams { cities: 100, routes: 120 })]
    fn encoded_map_decodes_to_seeded_map(#[case] params: MapBenchParams) {
        let encoded = encoded_map(&params, 42);
        let decoded = RoutingGraph::decode(encoded.as_slice()).expect("encoded map must decode");
        assert_eq!(decoded, seeded_map(&params, 42));
        assert_eq!(decoded.len(), params.cities);
    }
}
