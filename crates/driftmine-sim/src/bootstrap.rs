//! Starting-state fixtures.
//!
//! The core makes no assumption about which resources, stations, or upgrades
//! exist; these functions are one valid wiring of a playable world, usable
//! directly or as replay hooks ([`standard_catalog`], [`starter_kit`]).

use driftmine_ecs::{EcsError, Entity, World};

use crate::components::{
    units, ExtractionStation, Merchant, Modifier, ModifierTarget, OwnedBy, ProvidedByMerchant,
    ProvidedByUpgrade, Resource, ResourceGenerator, ResourceKind, SellPrice, UpgradeDefinition,
    UpgradeState, UpgradeStateKind, User, EXTRACTION_STATIONS, MERCHANTS, MODIFIERS, OWNED_BY,
    PROVIDED_BY_MERCHANT, PROVIDED_BY_UPGRADE, RESOURCES, RESOURCE_GENERATORS, SELL_PRICES,
    UPGRADE_DEFINITIONS, UPGRADE_STATES, USERS,
};
use crate::components::register_components;
use crate::singletons::register_singletons;

/// A fresh world with every component and singleton registered and nothing
/// else — the starting point for bootstrap, snapshot restore, and replay.
pub fn new_world() -> World {
    let mut world = World::new();
    register_components(&mut world);
    register_singletons(&mut world);
    world
}

/// Create a user entity with the given external id.
pub fn create_user(world: &mut World, id: &str) -> Result<Entity, EcsError> {
    let user = world.spawn();
    world.insert(
        &USERS,
        user,
        User {
            id: id.to_string(),
            name: format!("User-{id}"),
        },
    )?;
    Ok(user)
}

const BASE_RESOURCES: [(ResourceKind, i64, Option<i64>); 6] = [
    (ResourceKind::Ore, 0, Some(units(100))),
    (ResourceKind::Energy, 0, Some(units(50))),
    (ResourceKind::Food, 0, Some(units(50))),
    (ResourceKind::Money, 0, None),
    (ResourceKind::Crystal, 0, Some(units(10))),
    (ResourceKind::Artifact, 0, Some(units(10))),
];

/// One empty stock per resource kind, owned by `user`.
pub fn create_user_resources(world: &mut World, user: Entity) -> Result<(), EcsError> {
    for (kind, amount, cap) in BASE_RESOURCES {
        let stock = world.spawn();
        world.insert(&RESOURCES, stock, Resource { kind, amount, cap })?;
        world.insert(&OWNED_BY, stock, OwnedBy { owner: user })?;
    }
    Ok(())
}

const STATIONS: [(ResourceKind, i64); 3] = [
    (ResourceKind::Ore, units(1)),
    (ResourceKind::Energy, 500),
    (ResourceKind::Food, 500),
];

/// Unbuilt level-1 extraction stations with their generators, owned by `user`.
pub fn create_extraction_stations(world: &mut World, user: Entity) -> Result<(), EcsError> {
    for (resource, base_rate) in STATIONS {
        let station = world.spawn();
        world.insert(
            &EXTRACTION_STATIONS,
            station,
            ExtractionStation {
                resource,
                level: 1,
                built: false,
            },
        )?;
        world.insert(
            &RESOURCE_GENERATORS,
            station,
            ResourceGenerator {
                resource,
                base_rate,
            },
        )?;
        world.insert(&OWNED_BY, station, OwnedBy { owner: user })?;
    }
    Ok(())
}

const SELL_PRICE_LIST: [(ResourceKind, i64); 3] = [
    (ResourceKind::Ore, 1),
    (ResourceKind::Energy, 2),
    (ResourceKind::Food, 2),
];

/// The default merchant and its fixed price list.
pub fn create_merchant(world: &mut World) -> Result<Entity, EcsError> {
    let merchant = world.spawn();
    world.insert(
        &MERCHANTS,
        merchant,
        Merchant {
            id: "default".to_string(),
        },
    )?;

    for (resource, price_per_unit) in SELL_PRICE_LIST {
        let price = world.spawn();
        world.insert(
            &SELL_PRICES,
            price,
            SellPrice {
                resource,
                price_per_unit,
            },
        )?;
        world.insert(&PROVIDED_BY_MERCHANT, price, ProvidedByMerchant { merchant })?;
    }
    Ok(merchant)
}

/// The upgrade catalog: one available upgrade (`ore_station_level_2`, 50 ore +
/// 20 money, 30 s research) whose completion adds +1/s to ore generators.
pub fn create_upgrade_catalog(world: &mut World) -> Result<(), EcsError> {
    let upgrade = world.spawn();
    world.insert(
        &UPGRADE_DEFINITIONS,
        upgrade,
        UpgradeDefinition {
            id: "ore_station_level_2".to_string(),
            cost: [
                (ResourceKind::Ore, units(50)),
                (ResourceKind::Money, units(20)),
            ]
            .into_iter()
            .collect(),
            duration_ms: 30_000,
        },
    )?;
    world.insert(
        &UPGRADE_STATES,
        upgrade,
        UpgradeState {
            state: UpgradeStateKind::Available,
        },
    )?;

    let modifier = world.spawn();
    world.insert(
        &MODIFIERS,
        modifier,
        Modifier {
            target: ModifierTarget::GeneratorRate,
            resource: Some(ResourceKind::Ore),
            value: units(1),
        },
    )?;
    world.insert(&PROVIDED_BY_UPGRADE, modifier, ProvidedByUpgrade { source: upgrade })?;
    Ok(())
}

/// World-level fixtures in one call; matches the replay `seed_world` hook.
pub fn standard_catalog(world: &mut World) -> Result<(), EcsError> {
    create_merchant(world)?;
    create_upgrade_catalog(world)?;
    Ok(())
}

/// Per-user starting kit in one call; matches the replay `on_new_user` hook.
pub fn starter_kit(world: &mut World, user: Entity) -> Result<(), EcsError> {
    create_user_resources(world, user)?;
    create_extraction_stations(world, user)?;
    Ok(())
}
