//! Station construction from queued build commands.

use driftmine_ecs::query::query2;
use driftmine_ecs::{EcsError, World};

use crate::commands::drain_build_commands;
use crate::components::{units, ResourceKind, EXTRACTION_STATIONS, OWNED_BY, RESOURCES};
use crate::selectors::find_user_resource;

/// Fixed ore cost of building any station, fixed-point.
pub const STATION_BUILD_COST: i64 = units(20);

/// Drains the build queue. For each command: find the requester's first
/// unbuilt station of the requested kind, and if their ore covers the cost,
/// debit it and flip `built`. Every command is consumed regardless of outcome;
/// a failed attempt charges nothing and leaves no residue to retry.
pub fn build_station_system(world: &mut World) -> Result<(), EcsError> {
    for command in drain_build_commands(world)? {
        let mut target = None;
        for (entity, station, owned) in query2(world, &EXTRACTION_STATIONS, &OWNED_BY)? {
            if station.resource == command.station && !station.built && owned.owner == command.user
            {
                target = Some(entity);
                break;
            }
        }
        let Some(station_entity) = target else {
            continue;
        };

        let Some(ore_entity) = find_user_resource(world, command.user, ResourceKind::Ore)? else {
            continue;
        };
        let affordable = world
            .get(&RESOURCES, ore_entity)?
            .is_some_and(|ore| ore.amount >= STATION_BUILD_COST);
        if !affordable {
            log::debug!(
                "build {:?} for {} dropped: insufficient ore",
                command.station,
                command.user
            );
            continue;
        }

        if let Some(ore) = world.get_mut(&RESOURCES, ore_entity)? {
            ore.amount -= STATION_BUILD_COST;
        }
        if let Some(station) = world.get_mut(&EXTRACTION_STATIONS, station_entity)? {
            station.built = true;
        }
        log::info!("station {} built for {}", station_entity, command.user);
    }
    Ok(())
}
