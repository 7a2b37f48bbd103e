//! Entity handles and the per-world monotonic allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque entity handle. Identity only; carries no data of its own.
///
/// An entity conceptually exists for exactly as long as at least one component
/// table holds an entry for it. Ids are issued starting at 1 and are never
/// reused within the lifetime of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Rebuild a handle from a raw id (snapshot restore, test fixtures).
    pub const fn from_raw(id: u64) -> Self {
        Entity(id)
    }

    /// The raw integer id behind this handle.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic entity id source, owned by a single [`World`](crate::World).
///
/// Owning the counter per world keeps independent worlds (replay runs,
/// restored snapshots) from leaking ids into each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        EntityAllocator { next: 1 }
    }

    /// Issue the next handle.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// Rewind to a fresh state. Only valid when every world that saw the old
    /// ids is being discarded, e.g. at the start of a deterministic replay.
    pub fn reset(&mut self) {
        self.next = 1;
    }

    /// Ensure future allocations land strictly after `max_id`, so entities
    /// created after a snapshot restore never collide with restored ids.
    pub fn advance_past(&mut self, max_id: u64) {
        self.next = self.next.max(max_id + 1);
    }

    /// The id the next call to [`allocate`](Self::allocate) will hand out.
    pub fn peek_next(&self) -> u64 {
        self.next
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_monotonic_from_one() {
        let mut allocator = EntityAllocator::new();
        assert_eq!(allocator.allocate().id(), 1);
        assert_eq!(allocator.allocate().id(), 2);
        assert_eq!(allocator.allocate().id(), 3);
    }

    #[test]
    fn reset_rewinds_to_one() {
        let mut allocator = EntityAllocator::new();
        allocator.allocate();
        allocator.allocate();
        allocator.reset();
        assert_eq!(allocator.allocate().id(), 1);
    }

    #[test]
    fn advance_past_never_moves_backwards() {
        let mut allocator = EntityAllocator::new();
        allocator.advance_past(7);
        assert_eq!(allocator.allocate().id(), 8);
        allocator.advance_past(3);
        assert_eq!(allocator.allocate().id(), 9);
    }
}
