//! Structural world snapshots.
//!
//! A snapshot covers every registered table and singleton — including empty
//! ones — as plain structural data keyed by name and entity id. It is the only
//! transferable state shape, so it carries an explicit schema version field.
//! Key order is irrelevant to equality; values compare by deep structural
//! equality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EcsError;
use crate::world::World;

/// Bump when the snapshot layout or any component's wire shape changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One component table's contents, keyed by raw entity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub name: String,
    pub entries: BTreeMap<u64, Value>,
}

/// A serializable structural copy of an entire world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub components: Vec<ComponentSnapshot>,
    pub singletons: BTreeMap<String, Value>,
}

/// Capture the full state of `world`. Tables appear in name order, so two
/// snapshots of equal worlds are themselves equal.
pub fn snapshot_world(world: &World) -> Result<WorldSnapshot, EcsError> {
    let mut components = Vec::new();
    for table in world.tables() {
        components.push(ComponentSnapshot {
            name: table.name().to_string(),
            entries: table.snapshot_entries()?,
        });
    }

    let mut singletons = BTreeMap::new();
    for cell in world.singletons() {
        singletons.insert(cell.name().to_string(), cell.snapshot_value()?);
    }

    Ok(WorldSnapshot {
        version: SNAPSHOT_VERSION,
        components,
        singletons,
    })
}

/// Load `snapshot` into `world`, replacing its current contents.
///
/// The world must already carry registrations for every table and singleton
/// named in the snapshot (Rust tables are typed; they cannot be conjured from
/// structural data alone). A name with no registration is a configuration
/// error. After loading, the entity allocator is reset so the next allocation
/// lands one past the highest entity id found anywhere in the snapshot.
pub fn restore_into(snapshot: &WorldSnapshot, world: &mut World) -> Result<(), EcsError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(EcsError::SnapshotVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    world.clear_all_tables();

    let mut max_entity_id = 0u64;
    for component in &snapshot.components {
        let table = world.erased_table_mut(&component.name)?;
        table.restore_entries(&component.entries)?;
        if let Some(&id) = component.entries.keys().next_back() {
            max_entity_id = max_entity_id.max(id);
        }
    }

    for (name, value) in &snapshot.singletons {
        world.erased_singleton_mut(name)?.restore_value(value)?;
    }

    world.allocator_mut().reset();
    world.allocator_mut().advance_past(max_entity_id);
    Ok(())
}

/// Encode a snapshot to its transferable byte form.
pub fn encode(snapshot: &WorldSnapshot) -> Result<Vec<u8>, EcsError> {
    Ok(serde_json::to_vec(snapshot)?)
}

/// Decode a snapshot from its transferable byte form.
pub fn decode(bytes: &[u8]) -> Result<WorldSnapshot, EcsError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::singleton::SingletonKey;
    use crate::table::ComponentKey;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Health {
        value: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Armor {
        value: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i64,
    }

    const HEALTH: ComponentKey<Health> = ComponentKey::new("Health");
    const ARMOR: ComponentKey<Armor> = ComponentKey::new("Armor");
    const COUNTER: SingletonKey<Counter> = SingletonKey::new("Counter");

    fn registered_world() -> World {
        let mut world = World::new();
        world.register_component(&HEALTH);
        world.register_component(&ARMOR);
        world.register_singleton(&COUNTER, &Counter { count: 0 });
        world
    }

    fn populated_world() -> World {
        let mut world = registered_world();
        let a = world.spawn();
        let b = world.spawn();
        world.insert(&HEALTH, a, Health { value: 10 }).unwrap();
        world.insert(&HEALTH, b, Health { value: 20 }).unwrap();
        world.singleton_mut(&COUNTER).unwrap().count = 99;
        world
    }

    #[test]
    fn snapshot_covers_empty_tables() {
        let world = registered_world();
        let snapshot = snapshot_world(&world).unwrap();
        let names: Vec<&str> = snapshot
            .components
            .iter()
            .map(|component| component.name.as_str())
            .collect();
        assert_eq!(names, vec!["Armor", "Health"]);
        assert!(snapshot.singletons.contains_key("Counter"));
    }

    #[test]
    fn round_trip_preserves_structural_equality() {
        let world = populated_world();
        let snapshot = snapshot_world(&world).unwrap();

        let mut restored = registered_world();
        restore_into(&snapshot, &mut restored).unwrap();

        let second = snapshot_world(&restored).unwrap();
        assert_eq!(snapshot, second);
    }

    #[test]
    fn restore_advances_the_allocator_past_restored_ids() {
        let world = populated_world();
        let snapshot = snapshot_world(&world).unwrap();

        let mut restored = registered_world();
        restore_into(&snapshot, &mut restored).unwrap();
        assert_eq!(restored.spawn().id(), 3);
    }

    #[test]
    fn restored_world_is_independent_of_the_source() {
        let world = populated_world();
        let snapshot = snapshot_world(&world).unwrap();

        let mut restored = registered_world();
        restore_into(&snapshot, &mut restored).unwrap();
        restored
            .get_mut(&HEALTH, crate::Entity::from_raw(1))
            .unwrap()
            .unwrap()
            .value = -1;

        assert_eq!(
            world.get(&HEALTH, crate::Entity::from_raw(1)).unwrap(),
            Some(&Health { value: 10 })
        );
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let world = populated_world();
        let mut snapshot = snapshot_world(&world).unwrap();
        snapshot.version += 1;

        let mut restored = registered_world();
        assert!(matches!(
            restore_into(&snapshot, &mut restored),
            Err(EcsError::SnapshotVersion { .. })
        ));
    }

    #[test]
    fn unknown_component_name_is_rejected() {
        let world = populated_world();
        let snapshot = snapshot_world(&world).unwrap();

        let mut bare = World::new();
        assert!(matches!(
            restore_into(&snapshot, &mut bare),
            Err(EcsError::UnregisteredComponent(_))
        ));
    }

    #[test]
    fn byte_form_round_trips() {
        let world = populated_world();
        let snapshot = snapshot_world(&world).unwrap();
        let bytes = encode(&snapshot).unwrap();
        assert_eq!(decode(&bytes).unwrap(), snapshot);
    }
}
