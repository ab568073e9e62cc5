//! Symmetric routing graph between cities.
//!
//! Every route is stored together with its inverse at the neighbour, and
//! [`RoutingGraph::add_route`] is the only way to create routes so the pair can
//! never drift apart. Deleting a city repairs the table by removing the inverse
//! of each of its routes, which costs O(degree).

mod city;
mod direction;
mod text;

use std::collections::HashMap;

use rand::Rng;

use crate::error::RouteError;

pub use self::{
    city::{City, CityKey},
    direction::{Direction, ParseDirectionError},
};

/// Maximum number of routes leaving a single city, one per direction.
pub const MAX_ROUTES: usize = 4;

/// A directed route from a city towards a neighbour.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Route {
    to: CityKey,
    direction: Direction,
}

impl Route {
    /// Key of the neighbour the route leads to.
    #[must_use]
    pub const fn to(&self) -> &CityKey {
        &self.to
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// Outcome of a successful [`RoutingGraph::add_route`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteInsertion {
    /// The route and its inverse were created.
    Added,
    /// The identical route was already present; nothing changed.
    Existing,
}

/// Cities and the symmetric routes between them.
///
/// Lookups take normalised keys (see [`CityKey::from_name`]).
///
/// Equality compares cities and the set of routes leaving each city; the order
/// in which routes were inserted is ignored.
///
/// # Examples
/// ```
/// use invasion_core::{City, Direction, RoutingGraph};
///
/// let mut graph = RoutingGraph::default();
/// graph.add_city(City::new("Foo"));
/// graph.add_city(City::new("Bar"));
/// graph.add_route("foo", "bar", Direction::North).expect("route must be accepted");
///
/// assert_eq!(graph.route_count("foo"), 1);
/// assert_eq!(graph.routes("bar")[0].direction(), Direction::South);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RoutingGraph {
    cities: HashMap<CityKey, City>,
    routes: HashMap<CityKey, Vec<Route>>,
}

impl RoutingGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cities on the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` when no city is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Inserts `city`, replacing any record with the same key.
    ///
    /// Routes already attached to the key are kept.
    pub fn add_city(&mut self, city: City) {
        self.cities.insert(city.key().clone(), city);
    }

    /// Returns `true` if a city with `key` is on the map.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.cities.contains_key(key)
    }

    /// Looks up a city.
    #[must_use]
    pub fn city(&self, key: &str) -> Option<&City> {
        self.cities.get(key)
    }

    /// Looks up a city for mutation.
    pub fn city_mut(&mut self, key: &str) -> Option<&mut City> {
        self.cities.get_mut(key)
    }

    /// Routes leaving `key`, in insertion order.
    #[must_use]
    pub fn routes(&self, key: &str) -> &[Route] {
        self.routes.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of routes leaving `key`.
    #[must_use]
    pub fn route_count(&self, key: &str) -> usize {
        self.routes(key).len()
    }

    /// Keys of every city, in no particular order.
    pub fn city_keys(&self) -> impl Iterator<Item = &CityKey> {
        self.cities.keys()
    }

    /// Keys of every city, sorted ascending.
    #[must_use]
    pub fn sorted_city_keys(&self) -> Vec<CityKey> {
        let mut keys: Vec<CityKey> = self.cities.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates cities and their routes in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&City, &[Route])> {
        let mut keys: Vec<&CityKey> = self.cities.keys().collect();
        keys.sort_unstable();
        keys.into_iter().filter_map(move |key| {
            self.cities
                .get(key)
                .map(|city| (city, self.routes(key.as_str())))
        })
    }

    /// Every route-table entry, including entries for keys without a city.
    pub(crate) fn route_table(&self) -> impl Iterator<Item = (&CityKey, &[Route])> {
        self.routes
            .iter()
            .map(|(key, routes)| (key, routes.as_slice()))
    }

    /// Adds a route from `from` to `to` together with its inverse.
    ///
    /// Both names are normalised into keys. Missing endpoints are created with
    /// their key as display name. Re-adding an identical route is a no-op
    /// reported as [`RouteInsertion::Existing`].
    ///
    /// # Errors
    /// Returns [`RouteError::SelfRoute`] when both ends name the same city and
    /// [`RouteError::DirectionTaken`] when `from` already uses `direction` or
    /// `to` already uses its inverse for a different city. The graph is left
    /// unchanged on error.
    pub fn add_route(
        &mut self,
        from: &str,
        to: &str,
        direction: Direction,
    ) -> Result<RouteInsertion, RouteError> {
        let from = CityKey::from_name(from);
        let to = CityKey::from_name(to);
        if from == to {
            return Err(RouteError::SelfRoute { city: from });
        }
        let forward = self.bound(&from, &to, direction)?;
        let backward = self.bound(&to, &from, direction.inverse())?;
        if forward && backward {
            return Ok(RouteInsertion::Existing);
        }

        self.ensure_city(&from);
        self.ensure_city(&to);
        if !forward {
            self.push_route(&from, &to, direction);
        }
        if !backward {
            self.push_route(&to, &from, direction.inverse());
        }
        Ok(RouteInsertion::Added)
    }

    /// Removes a city and every route touching it.
    ///
    /// Returns the removed record, or `None` if the key was unknown.
    pub fn delete_city(&mut self, key: &str) -> Option<City> {
        let removed = self.cities.remove(key);
        let Some(routes) = self.routes.remove(key) else {
            return removed;
        };
        for route in routes {
            let back = route.direction.inverse();
            if let Some(peer_routes) = self.routes.get_mut(route.to.as_str()) {
                peer_routes.retain(|peer| !(peer.direction == back && peer.to.as_str() == key));
            }
        }
        removed
    }

    /// Picks a neighbour of `from` by drawing one of its routes uniformly.
    ///
    /// Sampling is uniform over routes, not over distinct neighbours. Returns
    /// `None` without consuming randomness when `from` has no routes.
    pub fn random_neighbour<R: Rng + ?Sized>(&self, rng: &mut R, from: &str) -> Option<&City> {
        let routes = self.routes(from);
        if routes.is_empty() {
            return None;
        }
        let route = routes.get(rng.gen_range(0..routes.len()))?;
        self.cities.get(route.to.as_str())
    }

    /// Reports whether `from` already binds `direction` to `to`.
    fn bound(&self, from: &CityKey, to: &CityKey, direction: Direction) -> Result<bool, RouteError> {
        let Some(existing) = self
            .routes(from.as_str())
            .iter()
            .find(|route| route.direction == direction)
        else {
            return Ok(false);
        };
        if existing.to == *to {
            Ok(true)
        } else {
            Err(RouteError::DirectionTaken {
                from: from.clone(),
                direction,
                existing: existing.to.clone(),
                requested: to.clone(),
            })
        }
    }

    fn ensure_city(&mut self, key: &CityKey) {
        if !self.cities.contains_key(key.as_str()) {
            self.cities
                .insert(key.clone(), City::from_key(key.clone()));
        }
    }

    /// Stores a one-way route without its inverse or any conflict check.
    #[cfg(test)]
    pub(crate) fn push_route_unchecked(&mut self, from: &str, to: &str, direction: Direction) {
        self.push_route(&CityKey::from_name(from), &CityKey::from_name(to), direction);
    }

    fn push_route(&mut self, from: &CityKey, to: &CityKey, direction: Direction) {
        self.routes
            .entry(from.clone())
            .or_insert_with(|| Vec::with_capacity(MAX_ROUTES))
            .push(Route {
                to: to.clone(),
                direction,
            });
    }
}

impl PartialEq for RoutingGraph {
    fn eq(&self, other: &Self) -> bool {
        self.cities == other.cities
            && self
                .routes
                .keys()
                .chain(other.routes.keys())
                .all(|key| same_routes(self.routes(key.as_str()), other.routes(key.as_str())))
    }
}

impl Eq for RoutingGraph {}

fn same_routes(left: &[Route], right: &[Route]) -> bool {
    left.len() == right.len() && left.iter().all(|route| right.contains(route))
}
