//! Per-world singleton values.
//!
//! A singleton is a named, typed, single-instance value that is not indexed by
//! entity — the simulation clock is the canonical example. Registration stores
//! a clone of the declared initial value, so two worlds never alias the same
//! instance.

use std::any::Any;
use std::marker::PhantomData;

use serde_json::Value;

use crate::error::EcsError;
use crate::table::Component;

/// Const handle naming a singleton kind.
pub struct SingletonKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SingletonKey<T> {
    pub const fn new(name: &'static str) -> Self {
        SingletonKey {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for SingletonKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SingletonKey<T> {}

/// The live value behind one registered singleton.
#[derive(Debug, Clone)]
pub(crate) struct SingletonCell<T> {
    name: &'static str,
    pub(crate) value: T,
}

impl<T: Component> SingletonCell<T> {
    pub(crate) fn new(name: &'static str, value: T) -> Self {
        SingletonCell { name, value }
    }
}

/// Type-erased view of a singleton cell for the registry and snapshot codec.
pub(crate) trait AnySingleton {
    fn name(&self) -> &'static str;
    fn snapshot_value(&self) -> Result<Value, EcsError>;
    fn restore_value(&mut self, value: &Value) -> Result<(), EcsError>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnySingleton for SingletonCell<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn snapshot_value(&self) -> Result<Value, EcsError> {
        Ok(serde_json::to_value(&self.value)?)
    }

    fn restore_value(&mut self, value: &Value) -> Result<(), EcsError> {
        self.value = serde_json::from_value(value.clone())?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
