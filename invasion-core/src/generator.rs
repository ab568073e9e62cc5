//! Random map generation.
//!
//! Cities get random hexadecimal names and routes are drawn between random
//! pairs until the requested number of new routes exists or no further route
//! can be placed.

use rand::Rng;
use tracing::{debug, instrument};

use crate::graph::{City, CityKey, Direction, RouteInsertion, RoutingGraph};

const NAME_BYTES: usize = 10;

/// Generates a map with exactly `cities` cities and up to `routes` routes.
///
/// A route and its inverse count once. Draws that pick the same city twice,
/// repeat an existing route, or collide with a taken direction are retried.
/// Generation stops early once no pair of distinct cities has a free
/// direction and a matching free inverse, so impossible requests terminate.
///
/// # Examples
/// ```
/// use invasion_core::generate_map;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = generate_map(&mut SmallRng::seed_from_u64(1), 10, 12);
/// assert_eq!(graph.len(), 10);
/// let routes: usize = graph.city_keys().map(|key| graph.route_count(key.as_str())).sum();
/// assert_eq!(routes, 24);
/// ```
#[instrument(name = "generator.generate_map", skip(rng))]
pub fn generate_map<R: Rng + ?Sized>(rng: &mut R, cities: usize, routes: usize) -> RoutingGraph {
    let mut graph = RoutingGraph::new();
    let mut keys = Vec::with_capacity(cities);
    let mut raw = [0_u8; NAME_BYTES];
    while keys.len() < cities {
        rng.fill_bytes(&mut raw);
        let name = hex::encode(raw);
        if graph.contains(&name) {
            continue;
        }
        let city = City::new(&name);
        keys.push(city.key().clone());
        graph.add_city(city);
    }

    let added = if keys.len() < 2 {
        0
    } else {
        connect(rng, &mut graph, &keys, routes)
    };
    debug!(cities = graph.len(), routes = added, "map generated");
    graph
}

fn connect<R: Rng + ?Sized>(
    rng: &mut R,
    graph: &mut RoutingGraph,
    keys: &[CityKey],
    routes: usize,
) -> usize {
    let mut slots = FreeSlots::new(keys.len());
    let mut added = 0;
    while added < routes && !slots.saturated() {
        let from = rng.gen_range(0..keys.len());
        let to = rng.gen_range(0..keys.len());
        if from == to {
            continue;
        }
        let direction = Direction::ALL
            .get(rng.gen_range(0..Direction::ALL.len()))
            .copied()
            .unwrap_or(Direction::North);
        let (Some(from_key), Some(to_key)) = (keys.get(from), keys.get(to)) else {
            continue;
        };
        if let Ok(RouteInsertion::Added) =
            graph.add_route(from_key.as_str(), to_key.as_str(), direction)
        {
            slots.take(from, direction);
            slots.take(to, direction.inverse());
            added += 1;
        }
    }
    added
}

/// Tracks which directions are still unbound at each city.
struct FreeSlots {
    free: Vec<[bool; 4]>,
    per_direction: [usize; 4],
    /// Cities with both directions of an axis free: north/south, east/west.
    both_free: [usize; 2],
}

impl FreeSlots {
    fn new(cities: usize) -> Self {
        Self {
            free: vec![[true; 4]; cities],
            per_direction: [cities; 4],
            both_free: [cities; 2],
        }
    }

    fn take(&mut self, city: usize, direction: Direction) {
        let Some(slots) = self.free.get_mut(city) else {
            return;
        };
        let index = direction.index();
        let inverse = direction.inverse().index();
        let was_free = slots.get(index).copied().unwrap_or(false);
        if !was_free {
            return;
        }
        if let Some(slot) = slots.get_mut(index) {
            *slot = false;
        }
        if let Some(count) = self.per_direction.get_mut(index) {
            *count = count.saturating_sub(1);
        }
        if slots.get(inverse).copied().unwrap_or(false) {
            if let Some(count) = self.both_free.get_mut(axis(direction)) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Returns `true` when no route between two distinct cities is possible.
    fn saturated(&self) -> bool {
        [Direction::North, Direction::East]
            .into_iter()
            .all(|direction| !self.axis_open(direction))
    }

    /// Whether some city has `direction` free while a different city has its
    /// inverse free.
    fn axis_open(&self, direction: Direction) -> bool {
        let count = |index: usize| self.per_direction.get(index).copied().unwrap_or(0);
        let forward = count(direction.index());
        let backward = count(direction.inverse().index());
        let both = self.both_free.get(axis(direction)).copied().unwrap_or(0);
        forward > 0 && backward > 0 && !(forward == 1 && backward == 1 && both == 1)
    }
}

const fn axis(direction: Direction) -> usize {
    match direction {
        Direction::North | Direction::South => 0,
        Direction::East | Direction::West => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn total_routes(graph: &RoutingGraph) -> usize {
        graph
            .city_keys()
            .map(|key| graph.route_count(key.as_str()))
            .sum()
    }

    /// Whether some pair of distinct cities could still take a new route.
    fn accepts_another_route(graph: &RoutingGraph) -> bool {
        let keys = graph.sorted_city_keys();
        keys.iter().any(|from| {
            keys.iter().filter(|to| *to != from).any(|to| {
                Direction::ALL.into_iter().any(|direction| {
                    matches!(
                        graph.clone().add_route(from.as_str(), to.as_str(), direction),
                        Ok(RouteInsertion::Added)
                    )
                })
            })
        })
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(10, 0)]
    #[case(25, 10)]
    #[case(100, 50)]
    fn creates_exact_city_count(#[case] cities: usize, #[case] routes: usize) {
        let graph = generate_map(&mut SmallRng::seed_from_u64(3), cities, routes);
        assert_eq!(graph.len(), cities);
        for (city, _) in graph.iter() {
            assert_eq!(city.name(), city.key().as_str());
            let raw = hex::decode(city.name()).expect("names must be lowercase hex");
            assert_eq!(raw.len(), NAME_BYTES);
        }
    }

    #[rstest]
    #[case(2, 1)]
    #[case(20, 15)]
    #[case(100, 120)]
    fn creates_requested_routes_symmetrically(#[case] cities: usize, #[case] routes: usize) {
        let graph = generate_map(&mut SmallRng::seed_from_u64(17), cities, routes);
        assert_eq!(total_routes(&graph), routes * 2);
        for key in graph.city_keys() {
            for route in graph.routes(key.as_str()) {
                assert!(graph.routes(route.to().as_str()).iter().any(|back| {
                    back.to() == key && back.direction() == route.direction().inverse()
                }));
            }
        }
    }

    #[rstest]
    #[case::single_city(1, 5)]
    #[case::no_cities(0, 5)]
    fn skips_routes_without_a_pair(#[case] cities: usize, #[case] routes: usize) {
        let graph = generate_map(&mut SmallRng::seed_from_u64(0), cities, routes);
        assert_eq!(total_routes(&graph), 0);
    }

    #[rstest]
    #[case::pair(2, 10, 4)]
    #[case::triple(3, 100, 6)]
    #[case::dense(8, 1_000, 16)]
    fn stops_when_saturated(#[case] cities: usize, #[case] routes: usize, #[case] ceiling: usize) {
        let graph = generate_map(&mut SmallRng::seed_from_u64(5), cities, routes);
        let placed = total_routes(&graph) / 2;
        assert!(placed <= ceiling);
        assert!(placed < routes);
        assert!(!accepts_another_route(&graph));
        assert!(graph
            .city_keys()
            .all(|key| graph.route_count(key.as_str()) <= crate::graph::MAX_ROUTES));
    }

    #[test]
    fn two_cities_fill_every_direction() {
        let graph = generate_map(&mut SmallRng::seed_from_u64(9), 2, 10);
        assert_eq!(total_routes(&graph), 8);
        assert!(!accepts_another_route(&graph));
    }

    #[test]
    fn partial_request_leaves_room_for_more() {
        let graph = generate_map(&mut SmallRng::seed_from_u64(9), 8, 3);
        assert_eq!(total_routes(&graph), 6);
        assert!(accepts_another_route(&graph));
    }

    #[rstest]
    #[case(0)]
    #[case(77)]
    fn same_seed_generates_same_map(#[case] seed: u64) {
        let first = generate_map(&mut SmallRng::seed_from_u64(seed), 40, 30);
        let second = generate_map(&mut SmallRng::seed_from_u64(seed), 40, 30);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn free_slots_close_single_city_axis() {
        let mut slots = FreeSlots::new(2);
        assert!(!slots.saturated());
        slots.take(0, Direction::North);
        slots.take(1, Direction::South);
        assert!(slots.axis_open(Direction::South));
        slots.take(0, Direction::South);
        slots.take(1, Direction::North);
        assert!(!slots.axis_open(Direction::North));
        assert!(slots.axis_open(Direction::East));
        slots.take(0, Direction::East);
        slots.take(1, Direction::West);
        assert!(slots.axis_open(Direction::West));
    }

    #[test]
    fn free_slots_need_two_distinct_cities() {
        let mut slots = FreeSlots::new(2);
        slots.take(1, Direction::North);
        slots.take(1, Direction::South);
        assert!(!slots.axis_open(Direction::North));
        assert!(slots.axis_open(Direction::East));
    }
}
