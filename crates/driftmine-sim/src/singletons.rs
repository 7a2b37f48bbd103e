//! Singleton definitions: the simulation clock and the pending command queue.

use driftmine_ecs::{SingletonKey, World};
use serde::{Deserialize, Serialize};

use crate::commands::PendingCommands;

/// The simulation clock. `accumulator_ms` holds real time not yet converted
/// into whole ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clock {
    pub now_ms: i64,
    pub tick: u64,
    pub accumulator_ms: i64,
}

pub const CLOCK: SingletonKey<Clock> = SingletonKey::new("Clock");
pub const COMMANDS: SingletonKey<PendingCommands> = SingletonKey::new("PendingCommands");

/// Register every singleton with its initial value on a fresh world.
pub fn register_singletons(world: &mut World) {
    world.register_singleton(&CLOCK, &Clock::default());
    world.register_singleton(&COMMANDS, &PendingCommands::default());
}
