//! Serial invasion engine.
//!
//! Each call to [`Invasion::advance`] plays one indivisible turn: a random
//! alien is picked, its move counter increases, and it either lands, moves
//! along a route, or becomes trapped. Two aliens meeting in a city destroy it
//! and die. All randomness flows through the injected generator in a fixed
//! order (alien first, then city or route) and every enumeration uses the
//! engine's sorted orderings, so identical seeds replay identical runs.

mod alien;

use std::io::{self, Write};

use rand::Rng;
use tracing::{debug, info, instrument, trace};

use crate::{
    event::Event,
    graph::{CityKey, RoutingGraph},
    invariants::InvariantChecker,
};

pub use self::alien::{Alien, AlienId};

const DEFAULT_ALIENS: usize = 100;
const DEFAULT_MAX_MOVES: usize = 10_000;

/// Configures and constructs [`Invasion`] instances.
///
/// # Examples
/// ```
/// use invasion_core::{InvasionBuilder, RoutingGraph};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph: RoutingGraph = "Foo north=Bar\nBar\n".parse().expect("map must decode");
/// let invasion = InvasionBuilder::new()
///     .with_aliens(2)
///     .with_max_moves(5)
///     .build(graph, SmallRng::seed_from_u64(7));
/// assert_eq!(invasion.aliens().count(), 2);
/// assert_eq!(invasion.max_moves(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct InvasionBuilder {
    aliens: usize,
    max_moves: usize,
}

impl Default for InvasionBuilder {
    fn default() -> Self {
        Self {
            aliens: DEFAULT_ALIENS,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }
}

impl InvasionBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of aliens.
    #[must_use]
    pub const fn with_aliens(mut self, aliens: usize) -> Self {
        self.aliens = aliens;
        self
    }

    /// Returns the configured number of aliens.
    #[must_use]
    pub const fn aliens(&self) -> usize {
        self.aliens
    }

    /// Overrides the per-alien move budget.
    #[must_use]
    pub const fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Returns the configured per-alien move budget.
    #[must_use]
    pub const fn max_moves(&self) -> usize {
        self.max_moves
    }

    /// Constructs an invasion over `graph` driven by `rng`.
    #[must_use]
    pub fn build<R: Rng>(self, graph: RoutingGraph, rng: R) -> Invasion<R> {
        Invasion::new(graph, rng, self.aliens, self.max_moves)
    }
}

/// Totals reported by [`Invasion::run`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Turns played.
    pub turns: usize,
    /// Cities destroyed during the run.
    pub cities_destroyed: usize,
    /// Cities still on the map.
    pub cities_remaining: usize,
    /// Aliens still in the active population.
    pub aliens_remaining: usize,
    /// Active aliens that are trapped.
    pub aliens_trapped: usize,
}

/// Turn-based invasion over a [`RoutingGraph`].
///
/// The engine owns the graph and the alien population. Aliens are stored in an
/// arena indexed by id; the active population and the remaining cities are
/// kept as ascending orderings that random picks index into.
#[derive(Debug)]
pub struct Invasion<R> {
    graph: RoutingGraph,
    rng: R,
    aliens: Vec<Alien>,
    alien_order: Vec<AlienId>,
    city_order: Vec<CityKey>,
    max_moves: usize,
    destroyed: usize,
}

impl<R: Rng> Invasion<R> {
    /// Creates an invasion of `aliens` unlanded aliens, each allowed
    /// `max_moves` turns.
    #[must_use]
    pub fn new(graph: RoutingGraph, rng: R, aliens: usize, max_moves: usize) -> Self {
        let population: Vec<Alien> = (0..aliens).map(|id| Alien::new(AlienId::new(id))).collect();
        let alien_order = population.iter().map(Alien::id).collect();
        let city_order = graph.sorted_city_keys();
        Self {
            graph,
            rng,
            aliens: population,
            alien_order,
            city_order,
            max_moves,
            destroyed: 0,
        }
    }

    /// Returns `true` while the map has cities and some active alien has
    /// moves left.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.graph.is_empty() && self.aliens().any(|alien| alien.moves() < self.max_moves)
    }

    /// Plays one turn and returns its events in order.
    ///
    /// Returns no events when the active population is empty.
    pub fn advance(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.alien_order.is_empty() {
            return events;
        }
        let slot = self.rng.gen_range(0..self.alien_order.len());
        let Some(id) = self.alien_order.get(slot).copied() else {
            return events;
        };
        let Some(alien) = self.aliens.get_mut(id.get()) else {
            return events;
        };
        alien.record_move();
        let idle = alien.is_trapped() || alien.is_dead();
        let location = alien.location().cloned();
        trace!(alien = %id, moves = alien.moves(), idle, "alien picked");

        match location {
            None => {
                if !self.graph.is_empty() {
                    self.land(id, &mut events);
                }
            }
            Some(from) if !idle => self.wander(id, &from, &mut events),
            Some(_) => {}
        }

        if self.alien(id).is_some_and(Alien::is_dead) {
            self.alien_order.remove(slot);
        }
        events
    }

    /// Advances until [`Invasion::is_valid`] turns false, writing every
    /// important event to `sink` on its own line.
    ///
    /// # Errors
    /// Propagates the first error returned by `sink`.
    #[instrument(
        name = "invasion.run",
        skip_all,
        fields(
            aliens = self.alien_order.len(),
            cities = self.graph.len(),
            max_moves = self.max_moves,
        ),
    )]
    pub fn run<W: Write>(&mut self, mut sink: W) -> io::Result<RunSummary> {
        let mut turns = 0_usize;
        while self.is_valid() {
            for event in self.advance().iter().filter(|event| event.is_important()) {
                writeln!(sink, "{event}")?;
            }
            turns += 1;
        }
        let summary = self.summary(turns);
        info!(
            turns = summary.turns,
            cities_destroyed = summary.cities_destroyed,
            cities_remaining = summary.cities_remaining,
            aliens_remaining = summary.aliens_remaining,
            aliens_trapped = summary.aliens_trapped,
            "invasion finished"
        );
        Ok(summary)
    }

    fn land(&mut self, id: AlienId, events: &mut Vec<Event>) {
        if self.city_order.is_empty() {
            return;
        }
        let index = self.rng.gen_range(0..self.city_order.len());
        let Some(key) = self.city_order.get(index).cloned() else {
            return;
        };
        let Some(city) = self.graph.city(key.as_str()) else {
            return;
        };
        events.push(Event::Invaded {
            alien: id,
            city: city.shared_name(),
        });
        self.occupy(id, &key, events);
    }

    fn wander(&mut self, id: AlienId, from: &CityKey, events: &mut Vec<Event>) {
        let Some(from_city) = self.graph.city(from.as_str()) else {
            return;
        };
        let from_name = from_city.shared_name();
        let next = self
            .graph
            .random_neighbour(&mut self.rng, from.as_str())
            .map(|city| (city.key().clone(), city.shared_name()));

        let Some((to, to_name)) = next else {
            if let Some(alien) = self.aliens.get_mut(id.get()) {
                alien.trap();
            }
            debug!(alien = %id, city = %from, "alien trapped");
            events.push(Event::Trapped {
                alien: id,
                city: from_name,
            });
            return;
        };

        events.push(Event::Moved {
            alien: id,
            from: from_name,
            to: to_name,
        });
        if let (Some(alien), Some(city)) = (
            self.aliens.get_mut(id.get()),
            self.graph.city_mut(from.as_str()),
        ) {
            alien.leave(city);
        }
        self.occupy(id, &to, events);
    }

    /// Places `id` in `key`, or resolves the fight if the city is held.
    fn occupy(&mut self, id: AlienId, key: &CityKey, events: &mut Vec<Event>) {
        let Some(city) = self.graph.city_mut(key.as_str()) else {
            return;
        };
        let Some(defender) = city.occupant() else {
            if let Some(alien) = self.aliens.get_mut(id.get()) {
                alien.invade(city);
            }
            return;
        };

        city.mark_destroyed();
        let name = city.shared_name();
        for fighter in [id, defender] {
            if let Some(alien) = self.aliens.get_mut(fighter.get()) {
                alien.die_at(key.clone());
            }
        }
        self.graph.delete_city(key.as_str());
        if let Ok(position) = self.city_order.binary_search(key) {
            self.city_order.remove(position);
        }
        self.destroyed += 1;
        debug!(city = %key, attacker = %id, defender = %defender, "city destroyed");
        events.push(Event::Destroyed {
            city: name,
            attacker: id,
            defender,
        });
    }
}

impl<R> Invasion<R> {
    /// Active aliens in ascending id order, including dead aliens that have
    /// not been picked since they died.
    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.alien_order
            .iter()
            .filter_map(|id| self.aliens.get(id.get()))
    }

    /// Looks up any alien of the population by id, active or not.
    #[must_use]
    pub fn alien(&self, id: AlienId) -> Option<&Alien> {
        self.aliens.get(id.get())
    }

    /// The map in its current state.
    #[must_use]
    pub const fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Consumes the invasion and returns the map.
    #[must_use]
    pub fn into_graph(self) -> RoutingGraph {
        self.graph
    }

    /// Per-alien move budget.
    #[must_use]
    pub const fn max_moves(&self) -> usize {
        self.max_moves
    }

    /// Checker over the current map and active population.
    #[must_use]
    pub fn invariants(&self) -> InvariantChecker<'_> {
        InvariantChecker::new(&self.graph, self.aliens())
    }

    fn summary(&self, turns: usize) -> RunSummary {
        RunSummary {
            turns,
            cities_destroyed: self.destroyed,
            cities_remaining: self.graph.len(),
            aliens_remaining: self.alien_order.len(),
            aliens_trapped: self.aliens().filter(|alien| alien.is_trapped()).count(),
        }
    }
}
