//! Each alien occupies at most one city.
use std::collections::HashMap;

use tracing::{debug, trace};

use super::{EvaluationMode, InvariantViolation, StateContext};
use crate::{graph::CityKey, invasion::AlienId};

pub(super) fn check_unique_claims(
    ctx: StateContext<'_>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    let mut claims: HashMap<AlienId, &CityKey> = HashMap::new();
    for (city, _) in ctx.graph.iter() {
        let Some(occupant) = city.occupant() else {
            continue;
        };
        trace!(city = %city.key(), alien = %occupant, "checking claim");
        if let Some(first) = claims.insert(occupant, city.key()) {
            debug!(alien = %occupant, first = %first, second = %city.key(), "double claim");
            mode.record(InvariantViolation::DoubleClaim {
                alien: occupant,
                first: first.clone(),
                second: city.key().clone(),
            })?;
        }
    }
    Ok(())
}
