//! Alien identifiers and per-alien state.

use std::fmt;

use crate::graph::{City, CityKey};

/// Stable identifier assigned to an alien when the population is created.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AlienId(usize);

impl AlienId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for AlienId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of a single invader.
///
/// `trapped` and `dead` are mutually exclusive: dying clears the trapped flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alien {
    id: AlienId,
    moves: usize,
    location: Option<CityKey>,
    trapped: bool,
    dead: bool,
}

impl Alien {
    /// Creates an alien that has not landed yet.
    #[must_use]
    pub const fn new(id: AlienId) -> Self {
        Self {
            id,
            moves: 0,
            location: None,
            trapped: false,
            dead: false,
        }
    }

    /// Identifier of the alien.
    #[must_use]
    pub const fn id(&self) -> AlienId {
        self.id
    }

    /// Turns in which the alien was picked, including idle ones.
    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    /// City the alien occupies, or the city it died in.
    #[must_use]
    pub const fn location(&self) -> Option<&CityKey> {
        self.location.as_ref()
    }

    /// Returns `true` once the alien found no route out of its city.
    #[must_use]
    pub const fn is_trapped(&self) -> bool {
        self.trapped
    }

    /// Returns `true` once the alien fought over a city.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    pub(crate) fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    /// Takes `city` and records it as the alien's location.
    pub(crate) fn invade(&mut self, city: &mut City) {
        city.occupy(self.id);
        self.location = Some(city.key().clone());
    }

    /// Releases `city` and clears the alien's location.
    pub(crate) fn leave(&mut self, city: &mut City) {
        city.vacate();
        self.location = None;
    }

    pub(crate) fn trap(&mut self) {
        self.trapped = true;
    }

    pub(crate) fn die_at(&mut self, city: CityKey) {
        self.dead = true;
        self.trapped = false;
        self.location = Some(city);
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, location: Option<CityKey>, trapped: bool, dead: bool) {
        self.location = location;
        self.trapped = trapped;
        self.dead = dead;
    }
}
