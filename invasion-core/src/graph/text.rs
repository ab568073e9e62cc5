//! Text snapshot format for routing graphs.
//!
//! Each line names a city followed by up to four `direction=City` tokens:
//!
//! ```text
//! Foo north=Bar west=Baz south=Qu-ux
//! Bar south=Foo west=Bee
//! ```
//!
//! City names may not contain `=`. Missing inverse routes are completed on
//! decode. Encoding lists cities in key order, and each city's routes in
//! insertion order.

use std::{
    fmt::{self, Write as _},
    io::{self, BufRead, Write},
    str::FromStr,
};

use crate::error::{DecodeError, MapFormatError};

use super::{City, Direction, MAX_ROUTES, Route, RoutingGraph};

impl RoutingGraph {
    /// Decodes a complete graph from `reader`.
    ///
    /// # Errors
    /// Returns [`DecodeError`] on the first malformed line or read failure.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use invasion_core::RoutingGraph;
    ///
    /// let graph = RoutingGraph::decode(Cursor::new("Foo south=Bar\nBar\n"))
    ///     .expect("map must decode");
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.route_count("bar"), 1);
    /// ```
    pub fn decode<R: BufRead>(reader: R) -> Result<Self, DecodeError> {
        let mut graph = Self::default();
        graph.read_from(reader)?;
        Ok(graph)
    }

    /// Reads lines from `reader` until end of input, adding every city and
    /// route found, and returns the number of bytes consumed.
    ///
    /// Blank lines are skipped. Cities are re-added each time they are named,
    /// so the last spelling of a name wins.
    ///
    /// # Errors
    /// Returns [`DecodeError::Format`] on the first malformed line and
    /// [`DecodeError::Io`] if reading fails. Both report the bytes consumed so
    /// far, including the failing line.
    pub fn read_from<R: BufRead>(&mut self, mut reader: R) -> Result<usize, DecodeError> {
        let mut consumed = 0;
        let mut number = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|source| DecodeError::Io { consumed, source })?;
            if read == 0 {
                return Ok(consumed);
            }
            consumed += read;
            number += 1;
            self.decode_line(number, &line)
                .map_err(|error| DecodeError::Format { consumed, error })?;
        }
    }

    /// Writes the graph to `writer` and returns the number of bytes written.
    ///
    /// Performs one write per city; pass a buffered writer for large maps.
    ///
    /// # Errors
    /// Propagates any error returned by `writer`.
    ///
    /// # Examples
    /// ```
    /// use invasion_core::{City, Direction, RoutingGraph};
    ///
    /// let mut graph = RoutingGraph::default();
    /// graph.add_city(City::new("Bar"));
    /// graph.add_city(City::new("Baz"));
    /// graph.add_route("bar", "baz", Direction::East).expect("route must be accepted");
    ///
    /// let mut out = Vec::new();
    /// let written = graph.write_to(&mut out).expect("write must succeed");
    /// assert_eq!(out, b"Bar east=Baz\nBaz west=Bar\n");
    /// assert_eq!(written, out.len());
    /// ```
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<usize> {
        let mut written = 0;
        let mut line = String::new();
        for (city, routes) in self.iter() {
            line.clear();
            self.render_line(city, routes, &mut line)
                .map_err(io::Error::other)?;
            writer.write_all(line.as_bytes())?;
            written += line.len();
        }
        Ok(written)
    }

    fn decode_line(&mut self, line: usize, text: &str) -> Result<(), MapFormatError> {
        let mut tokens = text.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        if name.contains('=') {
            return Err(MapFormatError::InvalidCityName {
                line,
                name: name.to_owned(),
            });
        }
        let routes: Vec<&str> = tokens.collect();
        if routes.len() > MAX_ROUTES {
            return Err(MapFormatError::TooManyDirections {
                line,
                found: routes.len(),
            });
        }

        let city = City::new(name);
        let key = city.key().clone();
        self.add_city(city);
        for (position, token) in (1..).zip(routes) {
            let (label, peer) =
                split_route(token).ok_or_else(|| MapFormatError::MalformedRoute {
                    line,
                    position,
                    token: token.to_owned(),
                })?;
            let direction: Direction =
                label
                    .parse()
                    .map_err(|_| MapFormatError::UnknownDirection {
                        line,
                        direction: label.to_owned(),
                    })?;
            self.add_route(key.as_str(), peer, direction)
                .map_err(|source| MapFormatError::Conflict { line, source })?;
            self.add_city(City::new(peer));
        }
        Ok(())
    }

    fn render_line(&self, city: &City, routes: &[Route], out: &mut impl fmt::Write) -> fmt::Result {
        out.write_str(city.name())?;
        for route in routes {
            let peer = self
                .city(route.to().as_str())
                .map_or(route.to().as_str(), City::name);
            write!(out, " {}={peer}", route.direction())?;
        }
        out.write_char('\n')
    }
}

fn split_route(token: &str) -> Option<(&str, &str)> {
    let (label, peer) = token.split_once('=')?;
    if label.is_empty() || peer.is_empty() || peer.contains('=') {
        return None;
    }
    Some((label, peer))
}

impl FromStr for RoutingGraph {
    type Err = DecodeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::decode(text.as_bytes())
    }
}

impl fmt::Display for RoutingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (city, routes) in self.iter() {
            self.render_line(city, routes, f)?;
        }
        Ok(())
    }
}
