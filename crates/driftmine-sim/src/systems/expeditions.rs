//! Expedition launch and progress.

use driftmine_ecs::query::query4;
use driftmine_ecs::{EcsError, World};

use crate::commands::drain_expedition_commands;
use crate::components::{
    units, Expedition, ExpeditionProgress, ExpeditionReward, OwnedBy, ResourceKind, EXPEDITIONS,
    EXPEDITION_PROGRESS, EXPEDITION_REWARDS, OWNED_BY, RESOURCES,
};
use crate::selectors::find_user_resource;

/// How long an expedition toward `target` runs.
pub const fn expedition_duration_ms(target: ResourceKind) -> i64 {
    match target {
        ResourceKind::Crystal => 60_000,
        _ => 120_000,
    }
}

/// Drains the expedition queue, spawning one expedition entity per command:
/// target, duration, zero progress, a one-unit reward of the target resource,
/// and the requesting owner.
pub fn start_expedition_system(world: &mut World) -> Result<(), EcsError> {
    for command in drain_expedition_commands(world)? {
        let expedition = world.spawn();
        world.insert(
            &EXPEDITIONS,
            expedition,
            Expedition {
                target: command.target,
                duration_ms: expedition_duration_ms(command.target),
            },
        )?;
        world.insert(
            &EXPEDITION_PROGRESS,
            expedition,
            ExpeditionProgress { elapsed_ms: 0 },
        )?;
        world.insert(
            &EXPEDITION_REWARDS,
            expedition,
            ExpeditionReward {
                resource: command.target,
                amount: units(1),
            },
        )?;
        world.insert(
            &OWNED_BY,
            expedition,
            OwnedBy {
                owner: command.user,
            },
        )?;
        log::debug!(
            "expedition {} toward {:?} started for {}",
            expedition,
            command.target,
            command.user
        );
    }
    Ok(())
}

/// Accrues elapsed time; once progress reaches the duration, credits the
/// reward to the owner's matching stock and deletes the expedition entity.
/// One-shot: no partial rewards, and the entity is gone either way.
pub fn expedition_progress_system(world: &mut World, delta_ms: i64) -> Result<(), EcsError> {
    let mut completed = Vec::new();
    for (entity, expedition, progress, reward, owned) in query4(
        world,
        &EXPEDITIONS,
        &EXPEDITION_PROGRESS,
        &EXPEDITION_REWARDS,
        &OWNED_BY,
    )? {
        let elapsed = progress.elapsed_ms + delta_ms;
        if elapsed < expedition.duration_ms {
            if let Some(progress) = world.get_mut(&EXPEDITION_PROGRESS, entity)? {
                progress.elapsed_ms = elapsed;
            }
            continue;
        }
        completed.push((entity, reward, owned.owner));
    }

    for (entity, reward, owner) in completed {
        if let Some(stock_entity) = find_user_resource(world, owner, reward.resource)? {
            if let Some(stock) = world.get_mut(&RESOURCES, stock_entity)? {
                stock.amount += reward.amount;
            }
        }
        world.despawn(entity);
        log::info!("expedition {} completed for {}", entity, owner);
    }
    Ok(())
}
