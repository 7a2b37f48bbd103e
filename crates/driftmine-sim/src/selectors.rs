//! Reusable read-only lookups shared by systems.
//!
//! "Find the first matching X" lives here, expressed through the query engine,
//! so every system inherits the same deterministic tie-break instead of
//! re-rolling its own scan.

use driftmine_ecs::query::{query1, query2};
use driftmine_ecs::{EcsError, Entity, World};

use crate::components::{
    ExtractionStation, Modifier, ModifierTarget, ResourceGenerator, ResourceKind,
    UpgradeStateKind, MODIFIERS, OWNED_BY, PROVIDED_BY_UPGRADE, RESOURCES, UPGRADE_STATES, USERS,
};

/// The first resource stock of `kind` owned by `user`, in query order.
pub fn find_user_resource(
    world: &World,
    user: Entity,
    kind: ResourceKind,
) -> Result<Option<Entity>, EcsError> {
    for (entity, resource, owned) in query2(world, &RESOURCES, &OWNED_BY)? {
        if owned.owner == user && resource.kind == kind {
            return Ok(Some(entity));
        }
    }
    Ok(None)
}

/// The user entity carrying the given external id, if any.
pub fn find_user_by_id(world: &World, user_id: &str) -> Result<Option<Entity>, EcsError> {
    for (entity, user) in query1(world, &USERS)? {
        if user.id == user_id {
            return Ok(Some(entity));
        }
    }
    Ok(None)
}

/// Modifiers whose providing upgrade has reached the completed state.
pub fn active_modifiers(world: &World) -> Result<Vec<Modifier>, EcsError> {
    let mut active = Vec::new();
    for (_, modifier, provided_by) in query2(world, &MODIFIERS, &PROVIDED_BY_UPGRADE)? {
        let Some(state) = world.get(&UPGRADE_STATES, provided_by.source)? else {
            continue;
        };
        if state.state != UpgradeStateKind::Completed {
            continue;
        }
        active.push(modifier);
    }
    Ok(active)
}

/// Effective production rate for one station: `base_rate × level` plus every
/// active generator-rate modifier that is unscoped or scoped to the station's
/// resource. Fixed-point units per second.
pub fn effective_generator_rate(
    station: &ExtractionStation,
    generator: &ResourceGenerator,
    active: &[Modifier],
) -> i64 {
    let mut rate = generator.base_rate * station.level;
    for modifier in active {
        if modifier.target != ModifierTarget::GeneratorRate {
            continue;
        }
        if modifier
            .resource
            .is_some_and(|kind| kind != generator.resource)
        {
            continue;
        }
        rate += modifier.value;
    }
    rate
}

/// All resource stocks owned by `user`, as `(kind, fixed-point amount)`.
pub fn user_resource_amounts(
    world: &World,
    user: Entity,
) -> Result<Vec<(ResourceKind, i64)>, EcsError> {
    let mut amounts = Vec::new();
    for (_, resource, owned) in query2(world, &RESOURCES, &OWNED_BY)? {
        if owned.owner == user {
            amounts.push((resource.kind, resource.amount));
        }
    }
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::units;

    fn station(level: i64) -> ExtractionStation {
        ExtractionStation {
            resource: ResourceKind::Ore,
            level,
            built: true,
        }
    }

    fn generator(base_rate: i64) -> ResourceGenerator {
        ResourceGenerator {
            resource: ResourceKind::Ore,
            base_rate,
        }
    }

    #[test]
    fn rate_scales_with_level() {
        assert_eq!(
            effective_generator_rate(&station(3), &generator(units(1)), &[]),
            units(3)
        );
    }

    #[test]
    fn scoped_modifier_only_applies_to_its_resource() {
        let active = [
            Modifier {
                target: ModifierTarget::GeneratorRate,
                resource: Some(ResourceKind::Ore),
                value: units(1),
            },
            Modifier {
                target: ModifierTarget::GeneratorRate,
                resource: Some(ResourceKind::Energy),
                value: units(5),
            },
            Modifier {
                target: ModifierTarget::GeneratorRate,
                resource: None,
                value: units(2),
            },
        ];
        // ore-scoped + unscoped apply, energy-scoped does not
        assert_eq!(
            effective_generator_rate(&station(1), &generator(units(1)), &active),
            units(4)
        );
    }
}
