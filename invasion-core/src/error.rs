//! Error types for the invasion core library.
//!
//! Route conflicts are raised synchronously by [`crate::RoutingGraph::add_route`];
//! format and I/O failures are raised while decoding a text snapshot.

use std::{fmt, io};

use thiserror::Error;

use crate::graph::{CityKey, Direction, MAX_ROUTES};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A route insertion that contradicts the routing table.
///
/// A failed insertion never modifies the graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RouteError {
    /// The route would connect a city to itself.
    #[error("{city} cannot route to itself")]
    SelfRoute {
        /// City named on both ends of the route.
        city: CityKey,
    },
    /// The direction is already bound to a different city.
    #[error(
        "route {from}->{requested} ({direction}) conflicts with existing {from}->{existing} ({direction})"
    )]
    DirectionTaken {
        /// City whose direction is already bound.
        from: CityKey,
        /// Direction that is already in use.
        direction: Direction,
        /// City the direction currently leads to.
        existing: CityKey,
        /// City the rejected route tried to reach.
        requested: CityKey,
    },
}

define_error_codes! {
    /// Stable codes describing [`RouteError`] variants.
    enum RouteErrorCode for RouteError {
        /// The route would connect a city to itself.
        SelfRoute => SelfRoute { .. } => "ROUTE_SELF",
        /// The direction is already bound to a different city.
        DirectionTaken => DirectionTaken { .. } => "ROUTE_DIRECTION_TAKEN",
    }
}

/// A malformed line in a text map snapshot.
///
/// Line numbers are 1-based and count blank lines.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MapFormatError {
    /// The line lists more directions than a city can hold.
    #[error("line {line}: expected a city and at most {MAX_ROUTES} directions, found {found}")]
    TooManyDirections {
        /// Offending line.
        line: usize,
        /// Number of direction tokens on the line.
        found: usize,
    },
    /// The city name contains `=`, which would make its routes ambiguous.
    #[error("line {line}: city name `{name}` must not contain `=`")]
    InvalidCityName {
        /// Offending line.
        line: usize,
        /// Raw name.
        name: String,
    },
    /// A direction token is not a single `direction=City` pair.
    #[error("line {line}: route {position} `{token}` is not in `direction=City` format")]
    MalformedRoute {
        /// Offending line.
        line: usize,
        /// 1-based position of the token among the line's routes.
        position: usize,
        /// Raw token.
        token: String,
    },
    /// A direction token names something other than a cardinal direction.
    #[error("line {line}: unknown direction `{direction}`")]
    UnknownDirection {
        /// Offending line.
        line: usize,
        /// Raw direction text.
        direction: String,
    },
    /// A route on the line conflicts with an established binding.
    #[error("line {line}: {source}")]
    Conflict {
        /// Offending line.
        line: usize,
        /// Conflict reported by the routing graph.
        #[source]
        source: RouteError,
    },
}

define_error_codes! {
    /// Stable codes describing [`MapFormatError`] variants.
    enum MapFormatErrorCode for MapFormatError {
        /// The line lists more directions than a city can hold.
        TooManyDirections => TooManyDirections { .. } => "MAP_TOO_MANY_DIRECTIONS",
        /// The city name contains `=`.
        InvalidCityName => InvalidCityName { .. } => "MAP_INVALID_CITY_NAME",
        /// A direction token is not a single `direction=City` pair.
        MalformedRoute => MalformedRoute { .. } => "MAP_MALFORMED_ROUTE",
        /// A direction token names something other than a cardinal direction.
        UnknownDirection => UnknownDirection { .. } => "MAP_UNKNOWN_DIRECTION",
        /// A route on the line conflicts with an established binding.
        Conflict => Conflict { .. } => "MAP_CONFLICTING_ROUTE",
    }
}

/// Error returned when decoding a text map snapshot.
///
/// Decoding stops at the first failure; `consumed` reports the bytes read up
/// to and including the failing line.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input contained a malformed line.
    #[error("invalid map after {consumed} bytes: {error}")]
    Format {
        /// Bytes consumed before decoding stopped.
        consumed: usize,
        /// Underlying format error.
        #[source]
        error: MapFormatError,
    },
    /// Reading the input failed.
    #[error("failed to read map after {consumed} bytes: {source}")]
    Io {
        /// Bytes consumed before decoding stopped.
        consumed: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`DecodeError`] variants.
    enum DecodeErrorCode for DecodeError {
        /// The input contained a malformed line.
        Format => Format { .. } => "DECODE_FORMAT",
        /// Reading the input failed.
        Io => Io { .. } => "DECODE_IO",
    }
}

impl DecodeError {
    /// Bytes consumed from the input before decoding stopped.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        match self {
            Self::Format { consumed, .. } | Self::Io { consumed, .. } => *consumed,
        }
    }

    /// Retrieve the inner [`MapFormatErrorCode`] when the input was malformed.
    #[must_use]
    pub const fn format_code(&self) -> Option<MapFormatErrorCode> {
        match self {
            Self::Format { error, .. } => Some(error.code()),
            Self::Io { .. } => None,
        }
    }
}
