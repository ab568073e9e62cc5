//! Invasion core library.
//!
//! Hosts the symmetric routing graph the aliens roam over, its text snapshot
//! codec, the random map generator, the turn-based invasion engine, and the
//! invariant checks used to validate a run after the fact.

mod error;
mod event;
mod generator;
mod graph;
mod invariants;
mod invasion;

pub use crate::{
    error::{
        DecodeError, DecodeErrorCode, MapFormatError, MapFormatErrorCode, RouteError,
        RouteErrorCode,
    },
    event::Event,
    generator::generate_map,
    graph::{
        City, CityKey, Direction, MAX_ROUTES, ParseDirectionError, Route, RouteInsertion,
        RoutingGraph,
    },
    invariants::{Invariant, InvariantChecker, InvariantViolation, verify_invariants},
    invasion::{Alien, AlienId, Invasion, InvasionBuilder, RunSummary},
};
