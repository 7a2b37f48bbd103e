//! The world aggregate: component tables, singletons, and the entity
//! allocator, owned exclusively by one simulation.

use std::collections::BTreeMap;

use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::singleton::{AnySingleton, SingletonCell, SingletonKey};
use crate::table::{AnyTable, Component, ComponentKey, Table};

/// A self-contained simulation state. Two worlds are fully independent; no
/// table, singleton, or allocator state is ever shared between them.
///
/// All component kinds are expected to be registered at world construction.
/// Requesting an unregistered kind is a wiring bug and surfaces as an
/// [`EcsError`], never as a silently-created default.
#[derive(Default)]
pub struct World {
    tables: BTreeMap<&'static str, Box<dyn AnyTable>>,
    singletons: BTreeMap<&'static str, Box<dyn AnySingleton>>,
    allocator: EntityAllocator,
}

impl World {
    pub fn new() -> Self {
        World {
            tables: BTreeMap::new(),
            singletons: BTreeMap::new(),
            allocator: EntityAllocator::new(),
        }
    }

    /// Issue a fresh entity handle.
    pub fn spawn(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Register an empty component table for `key`. Replaces (and drops) any
    /// table previously registered under the same name.
    pub fn register_component<T: Component>(&mut self, key: &ComponentKey<T>) {
        self.tables
            .insert(key.name(), Box::new(Table::<T>::new(key.name())));
    }

    /// Register a singleton, storing a clone of `initial`.
    pub fn register_singleton<T: Component>(&mut self, key: &SingletonKey<T>, initial: &T) {
        self.singletons.insert(
            key.name(),
            Box::new(SingletonCell::new(key.name(), initial.clone())),
        );
    }

    /// The typed table behind `key`.
    pub fn table<T: Component>(&self, key: &ComponentKey<T>) -> Result<&Table<T>, EcsError> {
        let table = self
            .tables
            .get(key.name())
            .ok_or_else(|| EcsError::UnregisteredComponent(key.name().to_string()))?;
        table
            .as_any()
            .downcast_ref::<Table<T>>()
            .ok_or(EcsError::ComponentTypeMismatch(key.name()))
    }

    pub fn table_mut<T: Component>(
        &mut self,
        key: &ComponentKey<T>,
    ) -> Result<&mut Table<T>, EcsError> {
        let table = self
            .tables
            .get_mut(key.name())
            .ok_or_else(|| EcsError::UnregisteredComponent(key.name().to_string()))?;
        table
            .as_any_mut()
            .downcast_mut::<Table<T>>()
            .ok_or(EcsError::ComponentTypeMismatch(key.name()))
    }

    /// Read one entity's value in one table. `Ok(None)` is the absence signal.
    pub fn get<T: Component>(
        &self,
        key: &ComponentKey<T>,
        entity: Entity,
    ) -> Result<Option<&T>, EcsError> {
        Ok(self.table(key)?.get(entity))
    }

    pub fn get_mut<T: Component>(
        &mut self,
        key: &ComponentKey<T>,
        entity: Entity,
    ) -> Result<Option<&mut T>, EcsError> {
        Ok(self.table_mut(key)?.get_mut(entity))
    }

    /// Attach a component value to an entity.
    pub fn insert<T: Component>(
        &mut self,
        key: &ComponentKey<T>,
        entity: Entity,
        value: T,
    ) -> Result<(), EcsError> {
        self.table_mut(key)?.insert(entity, value);
        Ok(())
    }

    /// Remove one entity's entry from one table. Returns the removed value.
    pub fn remove<T: Component>(
        &mut self,
        key: &ComponentKey<T>,
        entity: Entity,
    ) -> Result<Option<T>, EcsError> {
        Ok(self.table_mut(key)?.remove(entity))
    }

    pub fn has<T: Component>(
        &self,
        key: &ComponentKey<T>,
        entity: Entity,
    ) -> Result<bool, EcsError> {
        Ok(self.table(key)?.contains(entity))
    }

    /// Delete `entity`'s entry from every registered table. There is no other
    /// destroy primitive: an entity ceases to exist once no table refers to it.
    pub fn despawn(&mut self, entity: Entity) {
        for table in self.tables.values_mut() {
            table.delete(entity);
        }
    }

    /// The live singleton value behind `key`.
    pub fn singleton<T: Component>(&self, key: &SingletonKey<T>) -> Result<&T, EcsError> {
        let cell = self
            .singletons
            .get(key.name())
            .ok_or_else(|| EcsError::UnregisteredSingleton(key.name().to_string()))?;
        let cell = cell
            .as_any()
            .downcast_ref::<SingletonCell<T>>()
            .ok_or(EcsError::SingletonTypeMismatch(key.name()))?;
        Ok(&cell.value)
    }

    pub fn singleton_mut<T: Component>(
        &mut self,
        key: &SingletonKey<T>,
    ) -> Result<&mut T, EcsError> {
        let cell = self
            .singletons
            .get_mut(key.name())
            .ok_or_else(|| EcsError::UnregisteredSingleton(key.name().to_string()))?;
        let cell = cell
            .as_any_mut()
            .downcast_mut::<SingletonCell<T>>()
            .ok_or(EcsError::SingletonTypeMismatch(key.name()))?;
        Ok(&mut cell.value)
    }

    pub(crate) fn erased_table(&self, name: &str) -> Result<&dyn AnyTable, EcsError> {
        self.tables
            .get(name)
            .map(|table| table.as_ref())
            .ok_or_else(|| EcsError::UnregisteredComponent(name.to_string()))
    }

    pub(crate) fn erased_table_mut(&mut self, name: &str) -> Result<&mut dyn AnyTable, EcsError> {
        self.tables
            .get_mut(name)
            .map(|table| &mut **table as &mut dyn AnyTable)
            .ok_or_else(|| EcsError::UnregisteredComponent(name.to_string()))
    }

    pub(crate) fn erased_singleton_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut dyn AnySingleton, EcsError> {
        self.singletons
            .get_mut(name)
            .map(|cell| &mut **cell as &mut dyn AnySingleton)
            .ok_or_else(|| EcsError::UnregisteredSingleton(name.to_string()))
    }

    /// Registered tables in name order.
    pub(crate) fn tables(&self) -> impl Iterator<Item = &dyn AnyTable> {
        self.tables.values().map(|table| table.as_ref())
    }

    /// Registered singletons in name order.
    pub(crate) fn singletons(&self) -> impl Iterator<Item = &dyn AnySingleton> {
        self.singletons.values().map(|cell| cell.as_ref())
    }

    pub(crate) fn clear_all_tables(&mut self) {
        for table in self.tables.values_mut() {
            table.clear();
        }
    }

    pub(crate) fn allocator_mut(&mut self) -> &mut EntityAllocator {
        &mut self.allocator
    }

    pub fn allocator(&self) -> &EntityAllocator {
        &self.allocator
    }
}
