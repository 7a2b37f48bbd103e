//! Upgrade purchase and research progress.

use driftmine_ecs::query::{query2, query3};
use driftmine_ecs::{EcsError, Entity, World};

use crate::components::{
    UpgradeProgress, UpgradeStateKind, RESOURCES, UPGRADE_DEFINITIONS, UPGRADE_PROGRESS,
    UPGRADE_STATES,
};
use crate::selectors::find_user_resource;

/// Player-invoked purchase of the upgrade with the given catalog id.
///
/// Succeeds only when the definition is in the available state and the user
/// can cover every cost line. Validation completes before any debit, so a
/// rejection leaves all balances untouched — `Ok(false)`, not an error. On
/// success every line is debited, the state moves to in-progress, and a zero
/// progress component is attached.
pub fn purchase_upgrade(
    world: &mut World,
    user: Entity,
    upgrade_id: &str,
) -> Result<bool, EcsError> {
    let mut found = None;
    for (entity, definition, state) in query2(world, &UPGRADE_DEFINITIONS, &UPGRADE_STATES)? {
        if definition.id == upgrade_id && state.state == UpgradeStateKind::Available {
            found = Some((entity, definition));
            break;
        }
    }
    let Some((blueprint, definition)) = found else {
        return Ok(false);
    };

    // Resolve and check every cost line before touching any balance.
    let mut debits = Vec::new();
    for (&kind, &cost) in &definition.cost {
        let Some(stock_entity) = find_user_resource(world, user, kind)? else {
            return Ok(false);
        };
        let held = world
            .get(&RESOURCES, stock_entity)?
            .map_or(0, |stock| stock.amount);
        if held < cost {
            return Ok(false);
        }
        debits.push((stock_entity, cost));
    }

    for (stock_entity, cost) in debits {
        if let Some(stock) = world.get_mut(&RESOURCES, stock_entity)? {
            stock.amount -= cost;
        }
    }
    if let Some(state) = world.get_mut(&UPGRADE_STATES, blueprint)? {
        state.state = UpgradeStateKind::InProgress;
    }
    world.insert(&UPGRADE_PROGRESS, blueprint, UpgradeProgress { elapsed_ms: 0 })?;

    log::info!("upgrade {} purchased by {}", definition.id, user);
    Ok(true)
}

/// Accumulates elapsed time on in-progress upgrades and completes them once
/// elapsed reaches the configured duration (>= comparison, one-shot).
pub fn upgrade_progress_system(world: &mut World, delta_ms: i64) -> Result<(), EcsError> {
    for (entity, definition, state, progress) in
        query3(world, &UPGRADE_DEFINITIONS, &UPGRADE_STATES, &UPGRADE_PROGRESS)?
    {
        if state.state != UpgradeStateKind::InProgress {
            continue;
        }
        let elapsed = progress.elapsed_ms + delta_ms;
        if let Some(progress) = world.get_mut(&UPGRADE_PROGRESS, entity)? {
            progress.elapsed_ms = elapsed;
        }
        if elapsed >= definition.duration_ms {
            if let Some(state) = world.get_mut(&UPGRADE_STATES, entity)? {
                state.state = UpgradeStateKind::Completed;
            }
            log::info!("upgrade {} completed", definition.id);
        }
    }
    Ok(())
}
