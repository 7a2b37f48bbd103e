//! Production accrual for built stations.

use driftmine_ecs::query::query3;
use driftmine_ecs::{EcsError, World};

use crate::components::{EXTRACTION_STATIONS, OWNED_BY, RESOURCES, RESOURCE_GENERATORS};
use crate::selectors::{active_modifiers, effective_generator_rate, find_user_resource};

/// For every built station with a generator and an owner, accrues
/// `rate × delta_ms / 1000` onto the owner's matching resource stock. Rates
/// and amounts share the fixed-point scale, so the accrual stays in integers.
/// Caps are enforced later in the tick by the clamp system.
pub fn production_system(world: &mut World, delta_ms: i64) -> Result<(), EcsError> {
    let active = active_modifiers(world)?;
    let stations = query3(world, &EXTRACTION_STATIONS, &RESOURCE_GENERATORS, &OWNED_BY)?;

    for (_, station, generator, owned) in stations {
        if !station.built {
            continue;
        }
        let rate = effective_generator_rate(&station, &generator, &active);
        if rate <= 0 {
            continue;
        }
        let produced = rate * delta_ms / 1000;

        let Some(stock_entity) = find_user_resource(world, owned.owner, generator.resource)?
        else {
            continue;
        };
        if let Some(stock) = world.get_mut(&RESOURCES, stock_entity)? {
            stock.amount += produced;
        }
    }
    Ok(())
}
