//! Events emitted while the invasion advances.
//!
//! Events keep typed fields and shared city names; the human-readable message
//! is only produced when an event is displayed.

use std::{fmt, sync::Arc};

use crate::invasion::AlienId;

/// Something that happened during a single turn.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use invasion_core::{AlienId, Event};
///
/// let event = Event::Destroyed {
///     city: Arc::from("Foo"),
///     attacker: AlienId::new(1),
///     defender: AlienId::new(0),
/// };
/// assert!(event.is_important());
/// assert_eq!(event.to_string(), "Foo has been destroyed by alien 1 and alien 0!");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// An alien landed in its first city.
    Invaded {
        /// Alien that landed.
        alien: AlienId,
        /// Display name of the city.
        city: Arc<str>,
    },
    /// An alien travelled along a route.
    Moved {
        /// Alien that moved.
        alien: AlienId,
        /// Display name of the city it left.
        from: Arc<str>,
        /// Display name of the city it entered.
        to: Arc<str>,
    },
    /// An alien found no route out of its city.
    Trapped {
        /// Alien that is stuck.
        alien: AlienId,
        /// Display name of the city it is stuck in.
        city: Arc<str>,
    },
    /// Two aliens fought and destroyed a city.
    Destroyed {
        /// Display name of the destroyed city.
        city: Arc<str>,
        /// Alien that arrived during the turn.
        attacker: AlienId,
        /// Alien that already held the city.
        defender: AlienId,
    },
}

impl Event {
    /// Returns `true` for events that are written to the run's sink.
    #[must_use]
    pub const fn is_important(&self) -> bool {
        matches!(self, Self::Destroyed { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invaded { alien, city } => write!(f, "alien {alien} invades {city}"),
            Self::Moved { alien, from, to } => write!(f, "alien {alien} invades {to} from {from}"),
            Self::Trapped { alien, city } => write!(f, "alien {alien} trapped at {city}"),
            Self::Destroyed {
                city,
                attacker,
                defender,
            } => write!(
                f,
                "{city} has been destroyed by alien {attacker} and alien {defender}!"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::invaded(
        Event::Invaded { alien: AlienId::new(3), city: Arc::from("Foo") },
        "alien 3 invades Foo",
        false
    )]
    #[case::moved(
        Event::Moved { alien: AlienId::new(0), from: Arc::from("Foo"), to: Arc::from("Bar") },
        "alien 0 invades Bar from Foo",
        false
    )]
    #[case::trapped(
        Event::Trapped { alien: AlienId::new(7), city: Arc::from("Baz") },
        "alien 7 trapped at Baz",
        false
    )]
    #[case::destroyed(
        Event::Destroyed {
            city: Arc::from("Bam"),
            attacker: AlienId::new(2),
            defender: AlienId::new(5),
        },
        "Bam has been destroyed by alien 2 and alien 5!",
        true
    )]
    fn formats_on_display(#[case] event: Event, #[case] message: &str, #[case] important: bool) {
        assert_eq!(event.to_string(), message);
        assert_eq!(event.is_important(), important);
    }
}
