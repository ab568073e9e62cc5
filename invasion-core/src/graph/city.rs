//! City records and their normalised keys.

use std::{borrow::Borrow, fmt, sync::Arc};

use crate::invasion::AlienId;

/// Case-normalised identity of a city.
///
/// Keys are the lowercased city name. They are reference counted so events and
/// orderings can hold them without copying the text.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CityKey(Arc<str>);

impl CityKey {
    /// Derives the key for a human-readable city name.
    ///
    /// # Examples
    /// ```
    /// use invasion_core::CityKey;
    ///
    /// assert_eq!(CityKey::from_name("Tot-H").as_str(), "tot-h");
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(Arc::from(name.to_lowercase()))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point on the map.
///
/// # Examples
/// ```
/// use invasion_core::City;
///
/// let city = City::new("Foo");
/// assert_eq!(city.name(), "Foo");
/// assert_eq!(city.key().as_str(), "foo");
/// assert!(!city.is_occupied());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct City {
    key: CityKey,
    name: Arc<str>,
    occupant: Option<AlienId>,
    destroyed: bool,
}

impl City {
    /// Creates an unoccupied city keyed by its lowercased name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            key: CityKey::from_name(name),
            name: Arc::from(name),
            occupant: None,
            destroyed: false,
        }
    }

    /// Creates a placeholder city whose display name is its key.
    pub(crate) fn from_key(key: CityKey) -> Self {
        Self {
            name: Arc::clone(&key.0),
            key,
            occupant: None,
            destroyed: false,
        }
    }

    /// Normalised identity of the city.
    #[must_use]
    pub const fn key(&self) -> &CityKey {
        &self.key
    }

    /// Display name as first spelled by the map.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Alien currently holding the city, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<AlienId> {
        self.occupant
    }

    /// Returns `true` while an alien holds the city.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Returns `true` once two aliens fought here.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Records `alien` as the occupant.
    pub fn occupy(&mut self, alien: AlienId) {
        self.occupant = Some(alien);
    }

    /// Clears the occupant.
    pub fn vacate(&mut self) {
        self.occupant = None;
    }

    /// Marks the city as destroyed.
    pub fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}
