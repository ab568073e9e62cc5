//! Cardinal direction labels carried by routes.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// One of the four cardinal labels a route can carry.
///
/// Every direction has exactly one inverse; the routing graph stores each
/// route together with its inverse at the neighbour.
///
/// # Examples
/// ```
/// use invasion_core::Direction;
///
/// let direction: Direction = "North".parse().expect("direction must parse");
/// assert_eq!(direction.inverse(), Direction::South);
/// assert_eq!(direction.to_string(), "north");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    /// Towards the north; inverse of [`Direction::South`].
    North,
    /// Towards the south; inverse of [`Direction::North`].
    South,
    /// Towards the east; inverse of [`Direction::West`].
    East,
    /// Towards the west; inverse of [`Direction::East`].
    West,
}

impl Direction {
    /// Every direction, in the order used for random selection.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Returns the direction pointing back along the same route.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Returns the lowercase label used by the text map format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Position of the direction within [`Direction::ALL`].
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a cardinal direction.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown direction `{input}`; expected north, south, east, or west")]
pub struct ParseDirectionError {
    input: String,
}

impl ParseDirectionError {
    /// Raw text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| raw.eq_ignore_ascii_case(direction.as_str()))
            .ok_or_else(|| ParseDirectionError {
                input: raw.to_owned(),
            })
    }
}
