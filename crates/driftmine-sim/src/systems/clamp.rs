//! Resource clamping, last in the pipeline.

use driftmine_ecs::{EcsError, World};

use crate::components::RESOURCES;

/// Clamps every capped resource into `[0, cap]`. Runs after production and
/// rewards, so it always sees post-accrual amounts. Uncapped resources are
/// left alone.
pub fn resource_clamp_system(world: &mut World) -> Result<(), EcsError> {
    for (_, resource) in world.table_mut(&RESOURCES)?.iter_mut() {
        if let Some(cap) = resource.cap {
            resource.amount = resource.amount.max(0).min(cap);
        }
    }
    Ok(())
}
