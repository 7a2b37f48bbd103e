//! The per-world command queue.
//!
//! One-shot player requests (build a station, start an expedition) are queued
//! here and drained once per tick by their system, rather than being modeled
//! as short-lived event entities inside the component tables. The queue lives
//! in a singleton so pending requests serialize with snapshots and replay
//! deterministically. A drained command is consumed whether or not its effect
//! succeeds; retry is the caller's responsibility.

use driftmine_ecs::{EcsError, Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::ResourceKind;
use crate::singletons::COMMANDS;

/// Request to build the requester's unbuilt station of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStationCommand {
    pub user: Entity,
    pub station: ResourceKind,
}

/// Request to send an expedition after the given special resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartExpeditionCommand {
    pub user: Entity,
    pub target: ResourceKind,
}

/// All commands waiting for the next tick, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingCommands {
    pub build_stations: Vec<BuildStationCommand>,
    pub expeditions: Vec<StartExpeditionCommand>,
}

pub fn queue_build_station(
    world: &mut World,
    user: Entity,
    station: ResourceKind,
) -> Result<(), EcsError> {
    world
        .singleton_mut(&COMMANDS)?
        .build_stations
        .push(BuildStationCommand { user, station });
    Ok(())
}

pub fn queue_start_expedition(
    world: &mut World,
    user: Entity,
    target: ResourceKind,
) -> Result<(), EcsError> {
    world
        .singleton_mut(&COMMANDS)?
        .expeditions
        .push(StartExpeditionCommand { user, target });
    Ok(())
}

pub fn drain_build_commands(world: &mut World) -> Result<Vec<BuildStationCommand>, EcsError> {
    Ok(std::mem::take(
        &mut world.singleton_mut(&COMMANDS)?.build_stations,
    ))
}

pub fn drain_expedition_commands(
    world: &mut World,
) -> Result<Vec<StartExpeditionCommand>, EcsError> {
    Ok(std::mem::take(
        &mut world.singleton_mut(&COMMANDS)?.expeditions,
    ))
}
