//! Route-table symmetry and removal of destroyed cities.
//!
//! Routes are scanned in key order so fail-fast runs report the same
//! violation every time.
use tracing::{Level, debug, trace};

use super::{EvaluationMode, InvariantViolation, StateContext};

pub(super) fn check_symmetric_routes(
    ctx: StateContext<'_>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    let mut table: Vec<_> = ctx.graph.route_table().collect();
    table.sort_unstable_by(|left, right| left.0.cmp(right.0));
    if tracing::enabled!(Level::TRACE) {
        let routes: usize = table.iter().map(|(_, routes)| routes.len()).sum();
        trace!(routes, "checking route symmetry");
    }

    for (from, routes) in table {
        if !ctx.graph.contains(from.as_str()) {
            if !routes.is_empty() {
                mode.record(InvariantViolation::OrphanRoutes {
                    city: from.clone(),
                    routes: routes.len(),
                })?;
            }
            continue;
        }
        for route in routes {
            let to = route.to();
            let direction = route.direction();
            if !ctx.graph.contains(to.as_str()) {
                debug!(from = %from, to = %to, %direction, "route leads nowhere");
                mode.record(InvariantViolation::DanglingRoute {
                    from: from.clone(),
                    to: to.clone(),
                    direction,
                })?;
                continue;
            }
            let mirrored = ctx
                .graph
                .routes(to.as_str())
                .iter()
                .any(|back| back.to() == from && back.direction() == direction.inverse());
            if !mirrored {
                debug!(from = %from, to = %to, %direction, "missing inverse route");
                mode.record(InvariantViolation::MissingInverseRoute {
                    from: from.clone(),
                    to: to.clone(),
                    direction,
                })?;
            }
        }
    }
    Ok(())
}

pub(super) fn check_no_destroyed_cities(
    ctx: StateContext<'_>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    for (city, _) in ctx.graph.iter() {
        if city.is_destroyed() {
            mode.record(InvariantViolation::DestroyedCityPresent {
                city: city.key().clone(),
            })?;
        }
    }
    Ok(())
}
