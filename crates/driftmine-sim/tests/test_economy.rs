//! Economy flows: station construction, upgrade purchase/research, and sales.

use driftmine_ecs::query::query2;
use driftmine_ecs::{Entity, World};
use driftmine_sim::bootstrap::{
    create_merchant, create_upgrade_catalog, create_user, new_world, starter_kit,
};
use driftmine_sim::commands::queue_build_station;
use driftmine_sim::components::{
    units, ResourceKind, UpgradeStateKind, EXTRACTION_STATIONS, OWNED_BY, RESOURCES,
    UPGRADE_PROGRESS, UPGRADE_STATES,
};
use driftmine_sim::game_loop::advance;
use driftmine_sim::selectors::find_user_resource;
use driftmine_sim::singletons::COMMANDS;
use driftmine_sim::systems::{purchase_upgrade, sell_resource};

fn player_world() -> (World, Entity) {
    let mut world = new_world();
    let user = create_user(&mut world, "player-1").unwrap();
    starter_kit(&mut world, user).unwrap();
    create_merchant(&mut world).unwrap();
    create_upgrade_catalog(&mut world).unwrap();
    (world, user)
}

fn set_amount(world: &mut World, user: Entity, kind: ResourceKind, amount: i64) {
    let stock = find_user_resource(world, user, kind).unwrap().unwrap();
    world.get_mut(&RESOURCES, stock).unwrap().unwrap().amount = amount;
}

fn amount_of(world: &World, user: Entity, kind: ResourceKind) -> i64 {
    let stock = find_user_resource(world, user, kind).unwrap().unwrap();
    world.get(&RESOURCES, stock).unwrap().unwrap().amount
}

fn ore_station(world: &World, user: Entity) -> (Entity, bool) {
    for (entity, station, owned) in query2(world, &EXTRACTION_STATIONS, &OWNED_BY).unwrap() {
        if owned.owner == user && station.resource == ResourceKind::Ore {
            return (entity, station.built);
        }
    }
    panic!("no ore station");
}

#[test]
fn build_station_debits_ore_and_flips_built() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(30));

    queue_build_station(&mut world, user, ResourceKind::Ore).unwrap();
    advance(&mut world, 100).unwrap();

    let (_, built) = ore_station(&world, user);
    assert!(built);
    // 30 - 20 cost, plus one tick of production from the now-built station
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(10) + 100);
    assert!(world
        .singleton(&COMMANDS)
        .unwrap()
        .build_stations
        .is_empty());
}

#[test]
fn unaffordable_build_is_consumed_without_charge() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(10));

    queue_build_station(&mut world, user, ResourceKind::Ore).unwrap();
    advance(&mut world, 100).unwrap();

    let (_, built) = ore_station(&world, user);
    assert!(!built);
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(10));
    assert!(world
        .singleton(&COMMANDS)
        .unwrap()
        .build_stations
        .is_empty());
}

#[test]
fn purchase_debits_every_cost_line_and_starts_research() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(100));
    set_amount(&mut world, user, ResourceKind::Money, units(50));

    assert!(purchase_upgrade(&mut world, user, "ore_station_level_2").unwrap());
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(50));
    assert_eq!(amount_of(&world, user, ResourceKind::Money), units(30));

    let states: Vec<_> = world.table(&UPGRADE_STATES).unwrap().iter().collect();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].1.state, UpgradeStateKind::InProgress);
    assert_eq!(world.table(&UPGRADE_PROGRESS).unwrap().len(), 1);
}

#[test]
fn repeat_purchase_before_completion_is_rejected() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(100));
    set_amount(&mut world, user, ResourceKind::Money, units(50));

    assert!(purchase_upgrade(&mut world, user, "ore_station_level_2").unwrap());
    assert!(!purchase_upgrade(&mut world, user, "ore_station_level_2").unwrap());
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(50));
    assert_eq!(amount_of(&world, user, ResourceKind::Money), units(30));
}

#[test]
fn unaffordable_line_aborts_with_no_partial_debit() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(100));
    set_amount(&mut world, user, ResourceKind::Money, units(10));

    assert!(!purchase_upgrade(&mut world, user, "ore_station_level_2").unwrap());
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(100));
    assert_eq!(amount_of(&world, user, ResourceKind::Money), units(10));
}

#[test]
fn completed_upgrade_boosts_production() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(100));
    set_amount(&mut world, user, ResourceKind::Money, units(50));
    assert!(purchase_upgrade(&mut world, user, "ore_station_level_2").unwrap());

    // research runs to completion with the station still unbuilt
    advance(&mut world, 30_000).unwrap();
    let states: Vec<_> = world.table(&UPGRADE_STATES).unwrap().iter().collect();
    assert_eq!(states[0].1.state, UpgradeStateKind::Completed);

    let (station, _) = ore_station(&world, user);
    world
        .get_mut(&EXTRACTION_STATIONS, station)
        .unwrap()
        .unwrap()
        .built = true;
    set_amount(&mut world, user, ResourceKind::Ore, 0);

    // base 1/s plus the +1/s ore modifier
    advance(&mut world, 1000).unwrap();
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(2));
}

#[test]
fn selling_credits_money_at_list_price() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(80));

    let sold = sell_resource(&mut world, user, ResourceKind::Ore, 20).unwrap();
    assert_eq!(sold, units(20));
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), units(60));
    assert_eq!(amount_of(&world, user, ResourceKind::Money), units(20));
}

#[test]
fn selling_more_than_held_sells_the_holding() {
    let (mut world, user) = player_world();
    set_amount(&mut world, user, ResourceKind::Ore, units(5));

    let sold = sell_resource(&mut world, user, ResourceKind::Ore, 20).unwrap();
    assert_eq!(sold, units(5));
    assert_eq!(amount_of(&world, user, ResourceKind::Ore), 0);
    assert_eq!(amount_of(&world, user, ResourceKind::Money), units(5));
}

#[test]
fn selling_with_no_holding_or_no_price_is_a_noop() {
    let (mut world, user) = player_world();

    assert_eq!(sell_resource(&mut world, user, ResourceKind::Ore, 20).unwrap(), 0);
    // crystal has no price list entry
    set_amount(&mut world, user, ResourceKind::Crystal, units(3));
    assert_eq!(
        sell_resource(&mut world, user, ResourceKind::Crystal, 1).unwrap(),
        0
    );
    assert_eq!(amount_of(&world, user, ResourceKind::Crystal), units(3));
    assert_eq!(amount_of(&world, user, ResourceKind::Money), 0);
}
