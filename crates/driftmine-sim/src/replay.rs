//! Event replay: rebuild a world by re-applying a timestamped event log.
//!
//! Replay is the determinism anchor of the whole core: the same event list
//! must always produce a snapshot-identical world. Each run starts from a
//! fresh world (and therefore a fresh entity allocator), simulates the time
//! between consecutive events through the normal scheduler, and applies each
//! event through the same system calls a live session would use.

use std::collections::BTreeMap;

use driftmine_ecs::{EcsError, Entity, World};

use crate::bootstrap::new_world;
use crate::commands::{queue_build_station, queue_start_expedition};
use crate::components::{User, USERS};
use crate::events::GameEvent;
use crate::game_loop::advance;
use crate::selectors::find_user_by_id;
use crate::systems::{purchase_upgrade, sell_resource};

/// Hook installing catalog/merchant state into the fresh replay world.
pub type WorldHook = fn(&mut World) -> Result<(), EcsError>;

/// Hook run once per user the first time their id appears in the log.
pub type UserHook = fn(&mut World, Entity) -> Result<(), EcsError>;

#[derive(Default, Clone, Copy)]
pub struct ReplayOptions {
    /// Cap on total simulated time. A between-events delta that would push
    /// past the cap is skipped entirely, never truncated-and-applied.
    pub max_time_ms: Option<i64>,
    /// Apply events back-to-back without simulating the time between them.
    pub skip_simulation: bool,
    /// Bootstrap for world-level fixtures (upgrade catalog, merchant).
    pub seed_world: Option<WorldHook>,
    /// Bootstrap for per-user fixtures (starting resources, stations).
    pub on_new_user: Option<UserHook>,
}

pub struct ReplayResult {
    pub world: World,
    pub events_processed: usize,
    pub simulation_time_ms: i64,
    /// Logical user id -> entity mapping established during the run.
    pub users: BTreeMap<String, Entity>,
}

/// Replay `events` into a fresh world.
///
/// Events are stable-sorted by timestamp (input order preserved on ties).
/// Before each event except the first, the scheduler advances by the delta to
/// the previous event's timestamp, subject to `skip_simulation` and
/// `max_time_ms`. User ids map lazily to entities, created on first sight and
/// cached for the run.
pub fn replay_events(
    events: &[GameEvent],
    options: &ReplayOptions,
) -> Result<ReplayResult, EcsError> {
    let mut world = new_world();
    if let Some(seed_world) = options.seed_world {
        seed_world(&mut world)?;
    }

    let mut sorted: Vec<&GameEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.timestamp());

    let mut users: BTreeMap<String, Entity> = BTreeMap::new();
    let mut previous_timestamp: Option<i64> = None;
    let mut simulation_time_ms = 0i64;

    for event in sorted {
        let user = match users.get(event.user_id()) {
            Some(&entity) => entity,
            None => {
                let entity = ensure_user(&mut world, event.user_id())?;
                if let Some(on_new_user) = options.on_new_user {
                    on_new_user(&mut world, entity)?;
                }
                users.insert(event.user_id().to_string(), entity);
                entity
            }
        };

        if !options.skip_simulation {
            if let Some(previous) = previous_timestamp {
                let delta_ms = event.timestamp() - previous;
                let within_cap = options
                    .max_time_ms
                    .map_or(true, |cap| simulation_time_ms + delta_ms <= cap);
                if delta_ms > 0 && within_cap {
                    advance(&mut world, delta_ms)?;
                    simulation_time_ms += delta_ms;
                }
            }
        }

        apply_event(&mut world, user, event)?;
        previous_timestamp = Some(event.timestamp());
    }

    Ok(ReplayResult {
        world,
        events_processed: events.len(),
        simulation_time_ms,
        users,
    })
}

/// Route one event through the same entry point a live session would use.
/// Build and expedition requests queue commands for the next tick; sales and
/// purchases apply immediately. Domain rejections are absorbed silently, like
/// everywhere else.
fn apply_event(world: &mut World, user: Entity, event: &GameEvent) -> Result<(), EcsError> {
    match event {
        GameEvent::BuildStation { station_type, .. } => {
            queue_build_station(world, user, *station_type)
        }
        GameEvent::SellResource {
            resource_type,
            amount,
            ..
        } => sell_resource(world, user, *resource_type, *amount).map(|_| ()),
        GameEvent::StartExpedition { target, .. } => queue_start_expedition(world, user, *target),
        GameEvent::PurchaseUpgrade { upgrade_id, .. } => {
            purchase_upgrade(world, user, upgrade_id).map(|_| ())
        }
    }
}

fn ensure_user(world: &mut World, user_id: &str) -> Result<Entity, EcsError> {
    // seed_world hooks may have created users already
    if let Some(entity) = find_user_by_id(world, user_id)? {
        return Ok(entity);
    }
    let entity = world.spawn();
    world.insert(
        &USERS,
        entity,
        User {
            id: user_id.to_string(),
            name: format!("User-{user_id}"),
        },
    )?;
    Ok(entity)
}
