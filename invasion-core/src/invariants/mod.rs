//! Consistency checks over a map and its alien population.
//!
//! The checks are surfaced through [`Invasion::invariants`] and
//! [`verify_invariants`] so tests and fuzz runs can assert the state of a run
//! at any point between turns without reaching into engine internals.
//!
//! [`Invasion::invariants`]: crate::Invasion::invariants

mod alien_state;
mod claims;
mod routes;

use thiserror::Error;

use crate::{
    graph::{CityKey, Direction, RoutingGraph},
    invasion::{Alien, AlienId},
};

use self::{
    alien_state::check_alien_state,
    claims::check_unique_claims,
    routes::{check_no_destroyed_cities, check_symmetric_routes},
};

/// Enumerates the invariants a map and its aliens must satisfy between turns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Invariant {
    /// Trapped and dead flags agree with the alien's location.
    AlienState,
    /// No alien occupies two cities at once.
    UniqueClaims,
    /// Every route has its inverse and leads to an existing city.
    SymmetricRoutes,
    /// Destroyed cities are removed from the map.
    NoDestroyedCities,
}

impl Invariant {
    /// Returns all invariants in evaluation order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::AlienState,
            Self::UniqueClaims,
            Self::SymmetricRoutes,
            Self::NoDestroyedCities,
        ]
    }
}

/// Reports an invariant violation surfaced by [`InvariantChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// An alien is flagged both trapped and dead.
    #[error("alien {alien} is both trapped and dead")]
    TrappedAndDead {
        /// Offending alien.
        alien: AlienId,
    },
    /// A trapped alien has no location.
    #[error("alien {alien} is trapped without a location")]
    TrappedWithoutLocation {
        /// Offending alien.
        alien: AlienId,
    },
    /// A trapped alien sits in a city that is not on the map.
    #[error("alien {alien} is trapped in `{city}`, which is not on the map")]
    TrappedInMissingCity {
        /// Offending alien.
        alien: AlienId,
        /// Recorded location.
        city: CityKey,
    },
    /// A trapped alien sits in a destroyed city.
    #[error("alien {alien} is trapped in destroyed city `{city}`")]
    TrappedInDestroyedCity {
        /// Offending alien.
        alien: AlienId,
        /// Recorded location.
        city: CityKey,
    },
    /// A trapped alien's city still has routes out.
    #[error("alien {alien} is trapped in `{city}`, which has {routes} route(s)")]
    TrappedWithRoutes {
        /// Offending alien.
        alien: AlienId,
        /// Recorded location.
        city: CityKey,
        /// Routes leaving the city.
        routes: usize,
    },
    /// A dead alien's city is still on the map and not destroyed.
    #[error("alien {alien} is dead but `{city}` is intact")]
    DeadInIntactCity {
        /// Offending alien.
        alien: AlienId,
        /// Recorded location.
        city: CityKey,
    },
    /// Two cities record the same occupant.
    #[error("alien {alien} occupies both `{first}` and `{second}`")]
    DoubleClaim {
        /// Alien recorded twice.
        alien: AlienId,
        /// First city in key order.
        first: CityKey,
        /// Second city in key order.
        second: CityKey,
    },
    /// A route exists without its inverse at the target.
    #[error("route `{from}` {direction}=`{to}` has no inverse")]
    MissingInverseRoute {
        /// City the route leaves.
        from: CityKey,
        /// City the route leads to.
        to: CityKey,
        /// Direction of the one-way route.
        direction: Direction,
    },
    /// A route leads to a city that is not on the map.
    #[error("route `{from}` {direction}=`{to}` leads to a missing city")]
    DanglingRoute {
        /// City the route leaves.
        from: CityKey,
        /// Missing target.
        to: CityKey,
        /// Direction of the route.
        direction: Direction,
    },
    /// Routes are stored for a city that is not on the map.
    #[error("{routes} route(s) are stored for missing city `{city}`")]
    OrphanRoutes {
        /// Missing city.
        city: CityKey,
        /// Number of stored routes.
        routes: usize,
    },
    /// A destroyed city is still on the map.
    #[error("destroyed city `{city}` is still on the map")]
    DestroyedCityPresent {
        /// Offending city.
        city: CityKey,
    },
}

/// Runs every invariant over `graph` and `aliens`, returning the first
/// violation.
///
/// # Errors
/// Returns the first [`InvariantViolation`] found, in [`Invariant::all`]
/// order.
///
/// # Examples
/// ```
/// use invasion_core::{RoutingGraph, verify_invariants};
///
/// let graph: RoutingGraph = "Foo north=Bar\nBar\n".parse().expect("map must decode");
/// verify_invariants(&graph, []).expect("fresh map is consistent");
/// ```
pub fn verify_invariants<'a>(
    graph: &'a RoutingGraph,
    aliens: impl IntoIterator<Item = &'a Alien>,
) -> Result<(), InvariantViolation> {
    InvariantChecker::new(graph, aliens).check_all()
}

/// Runs invariant checks over a snapshot of a map and its aliens.
#[derive(Debug)]
pub struct InvariantChecker<'a> {
    graph: &'a RoutingGraph,
    aliens: Vec<&'a Alien>,
}

impl<'a> InvariantChecker<'a> {
    /// Creates a checker over `graph` and `aliens`.
    #[must_use]
    pub fn new(graph: &'a RoutingGraph, aliens: impl IntoIterator<Item = &'a Alien>) -> Self {
        Self {
            graph,
            aliens: aliens.into_iter().collect(),
        }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check_all(&self) -> Result<(), InvariantViolation> {
        self.check_many(Invariant::all())
    }

    /// Runs a subset of invariants in the provided order.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
    ) -> Result<(), InvariantViolation> {
        self.run_with_mode(invariants, EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn check(&self, invariant: Invariant) -> Result<(), InvariantViolation> {
        self.check_many([invariant])
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<InvariantViolation> {
        self.collect_many(Invariant::all())
    }

    /// Executes the selected invariants and returns every violation found.
    #[must_use]
    pub fn collect_many(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
    ) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        // Collect mode records instead of failing.
        let _ = self.run_with_mode(invariants, EvaluationMode::Collect(&mut violations));
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
        mut mode: EvaluationMode<'_>,
    ) -> Result<(), InvariantViolation> {
        let ctx = StateContext {
            graph: self.graph,
            aliens: &self.aliens,
        };
        for invariant in invariants {
            dispatch(ctx, invariant, &mut mode)?;
        }
        Ok(())
    }
}

fn dispatch(
    ctx: StateContext<'_>,
    invariant: Invariant,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    match invariant {
        Invariant::AlienState => check_alien_state(ctx, mode),
        Invariant::UniqueClaims => check_unique_claims(ctx, mode),
        Invariant::SymmetricRoutes => check_symmetric_routes(ctx, mode),
        Invariant::NoDestroyedCities => check_no_destroyed_cities(ctx, mode),
    }
}

#[derive(Clone, Copy)]
pub(super) struct StateContext<'a> {
    graph: &'a RoutingGraph,
    aliens: &'a [&'a Alien],
}

pub(super) enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<InvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(&mut self, violation: InvariantViolation) -> Result<(), InvariantViolation> {
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}
