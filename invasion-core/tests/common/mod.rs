use invasion_core::{City, Direction, RoutingGraph};
use invasion_test_support::profile::FuzzProfile;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

/// Builds a proptest configuration honouring `PROGTEST_CASES`.
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: FuzzProfile::load(default_cases, 0).cases(),
        ..ProptestConfig::default()
    }
}

/// Recipe for a small map: city names plus route attempts by index.
#[derive(Clone, Debug)]
pub struct MapRecipe {
    pub names: Vec<String>,
    pub routes: Vec<(usize, usize, usize)>,
}

impl MapRecipe {
    /// Builds the graph, ignoring route attempts that conflict.
    #[must_use]
    pub fn build(&self) -> RoutingGraph {
        let mut graph = RoutingGraph::new();
        for name in &self.names {
            graph.add_city(City::new(name));
        }
        for &(from, to, direction) in &self.routes {
            let (Some(from), Some(to), Some(direction)) = (
                self.names.get(from),
                self.names.get(to),
                Direction::ALL.get(direction),
            ) else {
                continue;
            };
            let _ = graph.add_route(from, to, *direction);
        }
        graph
    }
}

pub fn map_recipe() -> impl Strategy<Value = MapRecipe> {
    prop::collection::vec("[A-Za-z][A-Za-z0-9-]{0,6}", 1..12).prop_flat_map(|names| {
        let count = names.len();
        let routes = prop::collection::vec((0..count, 0..count, 0..4_usize), 0..30);
        (Just(names), routes).prop_map(|(names, routes)| MapRecipe { names, routes })
    })
}
