//! Driftmine Headless Simulation Harness
//!
//! Validates the deterministic core end-to-end without any host engine:
//! scheduler chunking, the backlog cap, economy flows, snapshot round-trips,
//! and replay determinism, all in-process.
//!
//! Usage:
//!   cargo run -p driftmine-simtest
//!   cargo run -p driftmine-simtest -- --verbose

use driftmine_ecs::snapshot::{encode, restore_into, snapshot_world};
use driftmine_ecs::{EcsError, Entity, World};
use driftmine_sim::bootstrap::{
    create_merchant, create_upgrade_catalog, create_user, new_world, standard_catalog, starter_kit,
};
use driftmine_sim::commands::queue_build_station;
use driftmine_sim::components::{units, ResourceKind, EXTRACTION_STATIONS, RESOURCES};
use driftmine_sim::events::GameEvent;
use driftmine_sim::game_loop::{advance, MAX_TICKS_PER_CALL, TICK_MS};
use driftmine_sim::replay::{replay_events, ReplayOptions};
use driftmine_sim::selectors::find_user_resource;
use driftmine_sim::singletons::CLOCK;
use driftmine_sim::systems::{purchase_upgrade, sell_resource};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|arg| arg == "--verbose");
    println!("=== Driftmine Simulation Harness ===\n");

    let mut results = Vec::new();

    results.extend(run(validate_scheduler));
    results.extend(run(validate_economy));
    results.extend(run(validate_snapshots));
    results.extend(run(validate_replay));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|result| result.passed).count();
    let failed = results.len() - passed;

    for result in &results {
        let icon = if result.passed { "✓" } else { "✗" };
        if !result.passed || verbose {
            println!("  {} {}: {}", icon, result.name, result.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run(scenario: fn() -> Result<Vec<TestResult>, EcsError>) -> Vec<TestResult> {
    match scenario() {
        Ok(results) => results,
        Err(err) => vec![check("scenario", false, format!("wiring error: {err}"))],
    }
}

/// Fresh world with one funded player, catalog, and merchant.
fn playable_world() -> Result<(World, Entity), EcsError> {
    let mut world = new_world();
    let user = create_user(&mut world, "harness")?;
    starter_kit(&mut world, user)?;
    create_merchant(&mut world)?;
    create_upgrade_catalog(&mut world)?;
    set_amount(&mut world, user, ResourceKind::Ore, units(100))?;
    set_amount(&mut world, user, ResourceKind::Money, units(50))?;
    Ok((world, user))
}

fn set_amount(
    world: &mut World,
    user: Entity,
    kind: ResourceKind,
    amount: i64,
) -> Result<(), EcsError> {
    if let Some(stock) = find_user_resource(world, user, kind)? {
        if let Some(resource) = world.get_mut(&RESOURCES, stock)? {
            resource.amount = amount;
        }
    }
    Ok(())
}

fn amount_of(world: &World, user: Entity, kind: ResourceKind) -> Result<i64, EcsError> {
    let Some(stock) = find_user_resource(world, user, kind)? else {
        return Ok(0);
    };
    Ok(world.get(&RESOURCES, stock)?.map_or(0, |resource| resource.amount))
}

// ── 1. Scheduler ────────────────────────────────────────────────────────

fn validate_scheduler() -> Result<Vec<TestResult>, EcsError> {
    let mut results = Vec::new();

    let (mut split, _) = playable_world()?;
    let (mut whole, _) = playable_world()?;
    advance(&mut split, 250)?;
    advance(&mut split, 750)?;
    advance(&mut whole, 1000)?;
    let split_clock = *split.singleton(&CLOCK)?;
    let whole_clock = *whole.singleton(&CLOCK)?;
    results.push(check(
        "scheduler chunking",
        split_clock == whole_clock,
        format!(
            "250+750 -> tick {}, 1000 -> tick {}",
            split_clock.tick, whole_clock.tick
        ),
    ));

    let (mut world, _) = playable_world()?;
    let ticks = advance(&mut world, TICK_MS * (MAX_TICKS_PER_CALL as i64 + 5))?;
    let clock = *world.singleton(&CLOCK)?;
    results.push(check(
        "backlog cap",
        ticks == MAX_TICKS_PER_CALL && clock.accumulator_ms == 0,
        format!("{ticks} ticks run, accumulator {} ms", clock.accumulator_ms),
    ));

    Ok(results)
}

// ── 2. Economy loop ─────────────────────────────────────────────────────

fn validate_economy() -> Result<Vec<TestResult>, EcsError> {
    let mut results = Vec::new();

    let (mut world, user) = playable_world()?;
    queue_build_station(&mut world, user, ResourceKind::Ore)?;
    advance(&mut world, 100)?;
    let built = world
        .table(&EXTRACTION_STATIONS)?
        .iter()
        .any(|(_, station)| station.resource == ResourceKind::Ore && station.built);
    let ore = amount_of(&world, user, ResourceKind::Ore)?;
    results.push(check(
        "station build",
        built && ore == units(80) + 100,
        format!("built={built}, ore={ore}"),
    ));

    advance(&mut world, 9_900)?;
    let ore = amount_of(&world, user, ResourceKind::Ore)?;
    results.push(check(
        "production accrual",
        ore == units(90),
        format!("ore after 10s of 1/s: {ore}"),
    ));

    let sold = sell_resource(&mut world, user, ResourceKind::Ore, 20)?;
    let money = amount_of(&world, user, ResourceKind::Money)?;
    results.push(check(
        "merchant sale",
        sold == units(20) && money == units(70),
        format!("sold={sold}, money={money}"),
    ));

    let purchased = purchase_upgrade(&mut world, user, "ore_station_level_2")?;
    let repeat = purchase_upgrade(&mut world, user, "ore_station_level_2")?;
    results.push(check(
        "upgrade purchase",
        purchased && !repeat,
        format!("first={purchased}, repeat={repeat}"),
    ));

    advance(&mut world, 30_000)?;
    set_amount(&mut world, user, ResourceKind::Ore, 0)?;
    advance(&mut world, 1_000)?;
    let boosted = amount_of(&world, user, ResourceKind::Ore)?;
    results.push(check(
        "completed upgrade boost",
        boosted == units(2),
        format!("ore after 1s at 2/s: {boosted}"),
    ));

    Ok(results)
}

// ── 3. Snapshots ────────────────────────────────────────────────────────

fn validate_snapshots() -> Result<Vec<TestResult>, EcsError> {
    let mut results = Vec::new();

    let (mut world, _) = playable_world()?;
    advance(&mut world, 5_000)?;
    let snapshot = snapshot_world(&world)?;

    let mut restored = new_world();
    restore_into(&snapshot, &mut restored)?;
    let second = snapshot_world(&restored)?;
    results.push(check(
        "snapshot round-trip",
        snapshot == second,
        format!(
            "{} component tables, {} singletons",
            snapshot.components.len(),
            snapshot.singletons.len()
        ),
    ));

    let bytes = encode(&snapshot)?;
    results.push(check(
        "snapshot byte form",
        driftmine_ecs::snapshot::decode(&bytes)? == snapshot,
        format!("{} bytes", bytes.len()),
    ));

    Ok(results)
}

// ── 4. Replay determinism ───────────────────────────────────────────────

fn funded_start(world: &mut World, user: Entity) -> Result<(), EcsError> {
    starter_kit(world, user)?;
    set_amount(world, user, ResourceKind::Ore, units(100))
}

fn validate_replay() -> Result<Vec<TestResult>, EcsError> {
    let mut results = Vec::new();

    let events = vec![
        GameEvent::BuildStation {
            user_id: "alice".to_string(),
            station_type: ResourceKind::Ore,
            timestamp: 1_000,
        },
        GameEvent::SellResource {
            user_id: "alice".to_string(),
            resource_type: ResourceKind::Ore,
            amount: 10,
            price: 1,
            timestamp: 15_000,
        },
        GameEvent::StartExpedition {
            user_id: "bob".to_string(),
            target: ResourceKind::Crystal,
            timestamp: 20_000,
        },
        GameEvent::SellResource {
            user_id: "bob".to_string(),
            resource_type: ResourceKind::Ore,
            amount: 5,
            price: 1,
            timestamp: 90_000,
        },
    ];
    let options = ReplayOptions {
        seed_world: Some(standard_catalog),
        on_new_user: Some(funded_start),
        ..Default::default()
    };

    let first = replay_events(&events, &options)?;
    let second = replay_events(&events, &options)?;
    let identical = snapshot_world(&first.world)? == snapshot_world(&second.world)?;
    results.push(check(
        "replay determinism",
        identical,
        format!(
            "{} events, {} ms simulated, {} users",
            first.events_processed, first.simulation_time_ms, first.users.len()
        ),
    ));

    let bob = first.users["bob"];
    let crystal = amount_of(&first.world, bob, ResourceKind::Crystal)?;
    results.push(check(
        "expedition lifecycle",
        crystal == units(1),
        format!("bob's crystal after replay: {crystal}"),
    ));

    Ok(results)
}
