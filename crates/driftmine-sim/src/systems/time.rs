//! Clock bookkeeping, first in the pipeline.

use driftmine_ecs::{EcsError, World};

use crate::singletons::CLOCK;

pub fn time_system(world: &mut World, delta_ms: i64) -> Result<(), EcsError> {
    let clock = world.singleton_mut(&CLOCK)?;
    clock.now_ms += delta_ms;
    clock.tick += 1;
    Ok(())
}
