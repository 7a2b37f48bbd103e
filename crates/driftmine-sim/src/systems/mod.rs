//! Mutation passes over the world.
//!
//! Tick-pipeline systems run in the fixed order defined by
//! [`game_loop::tick`](crate::game_loop::tick); later systems always observe
//! the fully-applied effects of earlier ones within the same tick.
//! [`purchase_upgrade`] and [`sell_resource`] are player-invoked
//! request/response operations outside the pipeline.

mod build_station;
mod clamp;
mod expeditions;
mod market;
mod production;
mod time;
mod upgrades;

pub use build_station::{build_station_system, STATION_BUILD_COST};
pub use clamp::resource_clamp_system;
pub use expeditions::{
    expedition_duration_ms, expedition_progress_system, start_expedition_system,
};
pub use market::sell_resource;
pub use production::production_system;
pub use time::time_system;
pub use upgrades::{purchase_upgrade, upgrade_progress_system};
