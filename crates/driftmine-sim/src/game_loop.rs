//! The fixed-timestep scheduler.
//!
//! Real elapsed time goes into the clock's accumulator; whole 100 ms ticks are
//! peeled off it, each running the system pipeline once in its fixed order.
//! The pipeline order is the concurrency contract: later systems always see
//! the fully-applied effects of earlier ones within the same tick.

use driftmine_ecs::{EcsError, World};

use crate::singletons::CLOCK;
use crate::systems::{
    build_station_system, expedition_progress_system, production_system, resource_clamp_system,
    start_expedition_system, time_system, upgrade_progress_system,
};

/// Length of one simulation tick.
pub const TICK_MS: i64 = 100;

/// Upper bound on ticks per [`advance`] call. Past it, the remaining backlog
/// is dropped rather than carried forward.
pub const MAX_TICKS_PER_CALL: u64 = 10_000;

/// Run the system pipeline once for a `delta_ms` step.
pub fn tick(world: &mut World, delta_ms: i64) -> Result<(), EcsError> {
    time_system(world, delta_ms)?;
    build_station_system(world)?;
    production_system(world, delta_ms)?;
    upgrade_progress_system(world, delta_ms)?;
    start_expedition_system(world)?;
    expedition_progress_system(world, delta_ms)?;
    resource_clamp_system(world)?;
    Ok(())
}

/// Feed `real_delta_ms` of wall-clock time into the simulation, running one
/// tick per full [`TICK_MS`] accumulated. Returns the number of ticks run.
///
/// Safety valve: after [`MAX_TICKS_PER_CALL`] ticks in a single call the
/// accumulator is zeroed and the call returns — a deliberate lossy degradation
/// after a huge time jump, not an error. Callers that need exact coverage of a
/// very large span must advance in bounded chunks.
pub fn advance(world: &mut World, real_delta_ms: i64) -> Result<u64, EcsError> {
    world.singleton_mut(&CLOCK)?.accumulator_ms += real_delta_ms;

    let mut ticks_run = 0u64;
    loop {
        let accumulator_ms = world.singleton(&CLOCK)?.accumulator_ms;
        if accumulator_ms < TICK_MS {
            break;
        }
        if ticks_run == MAX_TICKS_PER_CALL {
            log::warn!(
                "tick backlog capped at {} ticks; dropping {} ms",
                MAX_TICKS_PER_CALL,
                accumulator_ms
            );
            world.singleton_mut(&CLOCK)?.accumulator_ms = 0;
            break;
        }
        tick(world, TICK_MS)?;
        world.singleton_mut(&CLOCK)?.accumulator_ms -= TICK_MS;
        ticks_run += 1;
    }
    Ok(ticks_run)
}
