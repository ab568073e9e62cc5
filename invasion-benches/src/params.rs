//! Benchmark parameter types.

use std::fmt;

/// Size of a generated benchmark map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapBenchParams {
    /// Number of cities.
    pub cities: usize,
    /// Number of routes requested from the generator.
    pub routes: usize,
}

impl fmt::Display for MapBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cities={},routes={}", self.cities, self.routes)
    }
}

/// Parameters for a full invasion run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvasionBenchParams {
    /// Map to invade.
    pub map: MapBenchParams,
    /// Number of aliens.
    pub aliens: usize,
    /// Turns each alien may take.
    pub max_moves: usize,
}

impl fmt::Display for InvasionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},aliens={},moves={}",
            self.map, self.aliens, self.max_moves
        )
    }
}
