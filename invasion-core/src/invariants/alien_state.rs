//! Trapped and dead flags must agree with the map.
use tracing::{debug, trace};

use super::{EvaluationMode, InvariantViolation, StateContext};

pub(super) fn check_alien_state(
    ctx: StateContext<'_>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    trace!(aliens = ctx.aliens.len(), "checking alien state");
    for alien in ctx.aliens {
        let id = alien.id();
        if alien.is_trapped() && alien.is_dead() {
            debug!(alien = %id, "trapped and dead");
            mode.record(InvariantViolation::TrappedAndDead { alien: id })?;
        }

        if alien.is_trapped() {
            let Some(key) = alien.location() else {
                mode.record(InvariantViolation::TrappedWithoutLocation { alien: id })?;
                continue;
            };
            let Some(city) = ctx.graph.city(key.as_str()) else {
                mode.record(InvariantViolation::TrappedInMissingCity {
                    alien: id,
                    city: key.clone(),
                })?;
                continue;
            };
            if city.is_destroyed() {
                mode.record(InvariantViolation::TrappedInDestroyedCity {
                    alien: id,
                    city: key.clone(),
                })?;
            }
            let routes = ctx.graph.route_count(key.as_str());
            if routes > 0 {
                debug!(alien = %id, city = %key, routes, "trapped alien has a way out");
                mode.record(InvariantViolation::TrappedWithRoutes {
                    alien: id,
                    city: key.clone(),
                    routes,
                })?;
            }
        }

        if alien.is_dead() {
            let intact = alien
                .location()
                .and_then(|key| ctx.graph.city(key.as_str()))
                .filter(|city| !city.is_destroyed());
            if let Some(city) = intact {
                mode.record(InvariantViolation::DeadInIntactCity {
                    alien: id,
                    city: city.key().clone(),
                })?;
            }
        }
    }
    Ok(())
}
