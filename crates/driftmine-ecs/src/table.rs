//! Named, typed component tables.
//!
//! Each component kind owns one [`Table`] mapping `Entity -> T`. Tables never
//! store a "null" value; absence of an entry *is* the absence signal. Type
//! erasure happens only at the world registry boundary ([`AnyTable`]), never
//! inside a table's value type.

use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::EcsError;

/// Bound for component and singleton values: plain, structurally-comparable
/// data that can cross the snapshot boundary.
pub trait Component: Clone + PartialEq + Serialize + DeserializeOwned + 'static {}

impl<T: Clone + PartialEq + Serialize + DeserializeOwned + 'static> Component for T {}

/// Const handle naming a component kind. The name is the registry key; the
/// phantom type pins the table's value type at compile time.
pub struct ComponentKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentKey<T> {
    pub const fn new(name: &'static str) -> Self {
        ComponentKey {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ComponentKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentKey<T> {}

/// A named `Entity -> T` mapping.
///
/// Entries iterate in ascending entity id order. Queries inherit that order
/// from whichever table drives them, so it is part of the deterministic
/// contract, not an implementation detail.
#[derive(Debug, Clone)]
pub struct Table<T> {
    name: &'static str,
    entries: BTreeMap<Entity, T>,
}

impl<T: Component> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Table {
            name,
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach `value` to `entity`, replacing any previous entry. An entity
    /// occupies at most one slot per table.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.entries.insert(entity, value)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.entries.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.entries.get_mut(&entity)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.entries.remove(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entries.iter().map(|(&entity, value)| (entity, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entries
            .iter_mut()
            .map(|(&entity, value)| (entity, value))
    }
}

/// Type-erased view of a table, used by the world registry, the query
/// driver-selection step, and the snapshot codec.
pub(crate) trait AnyTable {
    fn name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn contains(&self, entity: Entity) -> bool;
    /// Entity ids in table iteration order.
    fn entities(&self) -> Vec<Entity>;
    fn delete(&mut self, entity: Entity) -> bool;
    fn clear(&mut self);
    fn snapshot_entries(&self) -> Result<BTreeMap<u64, Value>, EcsError>;
    fn restore_entries(&mut self, entries: &BTreeMap<u64, Value>) -> Result<(), EcsError>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyTable for Table<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    fn entities(&self) -> Vec<Entity> {
        self.entries.keys().copied().collect()
    }

    fn delete(&mut self, entity: Entity) -> bool {
        self.entries.remove(&entity).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn snapshot_entries(&self) -> Result<BTreeMap<u64, Value>, EcsError> {
        let mut entries = BTreeMap::new();
        for (entity, value) in &self.entries {
            entries.insert(entity.id(), serde_json::to_value(value)?);
        }
        Ok(entries)
    }

    fn restore_entries(&mut self, entries: &BTreeMap<u64, Value>) -> Result<(), EcsError> {
        self.entries.clear();
        for (&id, value) in entries {
            let value: T = serde_json::from_value(value.clone())?;
            self.entries.insert(Entity::from_raw(id), value);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Health {
        value: i64,
    }

    #[test]
    fn absent_entry_reads_as_none() {
        let mut table: Table<Health> = Table::new("Health");
        let a = Entity::from_raw(1);
        assert!(table.get(a).is_none());
        table.insert(a, Health { value: 10 });
        assert_eq!(table.get(a), Some(&Health { value: 10 }));
        table.remove(a);
        assert!(table.get(a).is_none());
    }

    #[test]
    fn one_slot_per_entity() {
        let mut table: Table<Health> = Table::new("Health");
        let a = Entity::from_raw(1);
        table.insert(a, Health { value: 10 });
        table.insert(a, Health { value: 20 });
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(a), Some(&Health { value: 20 }));
    }

    #[test]
    fn iteration_is_ascending_by_entity_id() {
        let mut table: Table<Health> = Table::new("Health");
        for id in [5u64, 2, 9, 1] {
            table.insert(Entity::from_raw(id), Health { value: id as i64 });
        }
        let ids: Vec<u64> = table.iter().map(|(entity, _)| entity.id()).collect();
        assert_eq!(ids, vec![1, 2, 5, 9]);
    }

    #[test]
    fn snapshot_entries_round_trip() {
        let mut table: Table<Health> = Table::new("Health");
        table.insert(Entity::from_raw(3), Health { value: 7 });
        let entries = table.snapshot_entries().unwrap();

        let mut restored: Table<Health> = Table::new("Health");
        restored.restore_entries(&entries).unwrap();
        assert_eq!(restored.get(Entity::from_raw(3)), Some(&Health { value: 7 }));
    }
}
