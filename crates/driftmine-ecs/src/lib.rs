//! Generic storage layer for the driftmine simulation core.
//!
//! Entities are opaque integer handles, behavior lives in named typed
//! component tables, and per-world singletons hold non-entity state such as
//! the simulation clock. Everything here is deterministic by construction:
//! tables iterate in ascending entity id order, queries have a documented
//! driver tie-break, and snapshots are structural copies with a schema
//! version.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`entity`] | Opaque handles and the per-world monotonic allocator |
//! | [`table`] | Named typed `Entity -> T` tables and their keys |
//! | [`singleton`] | Named per-world single-instance values |
//! | [`world`] | The owning aggregate passed to every operation |
//! | [`query`] | Multi-table joins with exclusion / cap / union variants |
//! | [`snapshot`] | Structural serialize/restore of a whole world |
//! | [`error`] | Fatal wiring and codec errors |

pub mod entity;
pub mod error;
pub mod query;
pub mod singleton;
pub mod snapshot;
pub mod table;
pub mod world;

pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use singleton::SingletonKey;
pub use snapshot::{snapshot_world, restore_into, WorldSnapshot, SNAPSHOT_VERSION};
pub use table::{Component, ComponentKey, Table};
pub use world::World;
