//! Deterministic fixed-timestep simulation over `driftmine-ecs`.
//!
//! Single-threaded, synchronous, cooperative: every operation runs to
//! completion before the next begins, and the fixed system order inside a tick
//! is the whole concurrency contract. Hosts that introduce real parallelism
//! must keep one exclusive owner per world.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | Domain component types, table keys, fixed-point policy |
//! | [`singletons`] | The clock and pending-command singletons |
//! | [`commands`] | Queued one-shot player requests, drained once per tick |
//! | [`systems`] | The tick pipeline passes and request/response operations |
//! | [`game_loop`] | Fixed-timestep scheduler (100 ms ticks, backlog cap) |
//! | [`selectors`] | Shared read-only lookups with one tie-break |
//! | [`events`] | The durable, replayable event log format |
//! | [`replay`] | Deterministic world reconstruction from an event log |
//! | [`bootstrap`] | Starting-state fixtures and replay hooks |

pub mod bootstrap;
pub mod commands;
pub mod components;
pub mod events;
pub mod game_loop;
pub mod replay;
pub mod selectors;
pub mod singletons;
pub mod systems;

pub use driftmine_ecs as ecs;
