//! Domain component definitions and their table keys.
//!
//! All quantities follow one numeric policy: integer fixed-point with
//! [`RESOURCE_SCALE`]. Stored amounts, caps, generator rates (milli-units per
//! second), modifier bonuses, upgrade costs, and expedition rewards all carry
//! the scale; sell prices are plain per-unit multipliers. The scale is part of
//! the snapshot wire format.

use std::collections::BTreeMap;

use driftmine_ecs::{ComponentKey, Entity};
use serde::{Deserialize, Serialize};

/// Fixed-point scale for resource accounting: 1 unit == 1000 stored.
pub const RESOURCE_SCALE: i64 = 1000;

/// Whole units -> stored fixed-point amount.
pub const fn units(n: i64) -> i64 {
    n * RESOURCE_SCALE
}

/// Stored fixed-point amount -> whole units, for display only.
pub fn to_units(amount: i64) -> f64 {
    amount as f64 / RESOURCE_SCALE as f64
}

/// Every resource kind the simulation accounts for.
///
/// Ore, energy, and food are extractable (stations exist for them); crystal
/// and artifact come back from expeditions; money only ever comes from the
/// merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Ore,
    Energy,
    Food,
    Money,
    Crystal,
    Artifact,
}

/// A player. The id is the external, durable identity used by the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Back-reference from an owned thing to its owning entity. A relationship,
/// never an ownership edge: deleting the owner does not cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedBy {
    pub owner: Entity,
}

/// A stock of one resource kind. `amount` and `cap` are fixed-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub amount: i64,
    pub cap: Option<i64>,
}

/// An extraction site. Produces nothing until `built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStation {
    pub resource: ResourceKind,
    pub level: i64,
    pub built: bool,
}

/// Base production attached to a station. `base_rate` is fixed-point units
/// per second (1000 == one unit/sec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGenerator {
    pub resource: ResourceKind,
    pub base_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: String,
}

/// Fixed per-unit sale price for one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellPrice {
    pub resource: ResourceKind,
    pub price_per_unit: i64,
}

/// Links a price entry to the merchant offering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedByMerchant {
    pub merchant: Entity,
}

/// Catalog entry for a purchasable upgrade. Costs are fixed-point per line;
/// all lines must be affordable for a purchase to go through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    pub id: String,
    pub cost: BTreeMap<ResourceKind, i64>,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeStateKind {
    Locked,
    Available,
    InProgress,
    Completed,
}

/// State machine slot for one upgrade: locked → available → inProgress →
/// completed, one-shot, never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub state: UpgradeStateKind,
}

/// Elapsed research time for an in-progress upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeProgress {
    pub elapsed_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierTarget {
    GeneratorRate,
}

/// Additive effect on a named target, optionally scoped to one resource kind.
/// `value` shares the generator-rate scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub target: ModifierTarget,
    pub resource: Option<ResourceKind>,
    pub value: i64,
}

/// Links a modifier to the upgrade whose completion activates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedByUpgrade {
    pub source: Entity,
}

/// A running expedition toward one special resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expedition {
    pub target: ResourceKind,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionProgress {
    pub elapsed_ms: i64,
}

/// What lands in the owner's stock when the expedition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionReward {
    pub resource: ResourceKind,
    pub amount: i64,
}

pub const USERS: ComponentKey<User> = ComponentKey::new("User");
pub const OWNED_BY: ComponentKey<OwnedBy> = ComponentKey::new("OwnedBy");
pub const RESOURCES: ComponentKey<Resource> = ComponentKey::new("Resource");
pub const EXTRACTION_STATIONS: ComponentKey<ExtractionStation> =
    ComponentKey::new("ExtractionStation");
pub const RESOURCE_GENERATORS: ComponentKey<ResourceGenerator> =
    ComponentKey::new("ResourceGenerator");
pub const MERCHANTS: ComponentKey<Merchant> = ComponentKey::new("Merchant");
pub const SELL_PRICES: ComponentKey<SellPrice> = ComponentKey::new("SellPrice");
pub const PROVIDED_BY_MERCHANT: ComponentKey<ProvidedByMerchant> =
    ComponentKey::new("ProvidedByMerchant");
pub const UPGRADE_DEFINITIONS: ComponentKey<UpgradeDefinition> =
    ComponentKey::new("UpgradeDefinition");
pub const UPGRADE_STATES: ComponentKey<UpgradeState> = ComponentKey::new("UpgradeState");
pub const UPGRADE_PROGRESS: ComponentKey<UpgradeProgress> = ComponentKey::new("UpgradeProgress");
pub const MODIFIERS: ComponentKey<Modifier> = ComponentKey::new("Modifier");
pub const PROVIDED_BY_UPGRADE: ComponentKey<ProvidedByUpgrade> =
    ComponentKey::new("ProvidedByUpgrade");
pub const EXPEDITIONS: ComponentKey<Expedition> = ComponentKey::new("Expedition");
pub const EXPEDITION_PROGRESS: ComponentKey<ExpeditionProgress> =
    ComponentKey::new("ExpeditionProgress");
pub const EXPEDITION_REWARDS: ComponentKey<ExpeditionReward> =
    ComponentKey::new("ExpeditionReward");

/// Register every component kind on a fresh world. Callers that restore
/// snapshots or run replays must register the full set first.
pub fn register_components(world: &mut driftmine_ecs::World) {
    world.register_component(&USERS);
    world.register_component(&OWNED_BY);
    world.register_component(&RESOURCES);
    world.register_component(&EXTRACTION_STATIONS);
    world.register_component(&RESOURCE_GENERATORS);
    world.register_component(&MERCHANTS);
    world.register_component(&SELL_PRICES);
    world.register_component(&PROVIDED_BY_MERCHANT);
    world.register_component(&UPGRADE_DEFINITIONS);
    world.register_component(&UPGRADE_STATES);
    world.register_component(&UPGRADE_PROGRESS);
    world.register_component(&MODIFIERS);
    world.register_component(&PROVIDED_BY_UPGRADE);
    world.register_component(&EXPEDITIONS);
    world.register_component(&EXPEDITION_PROGRESS);
    world.register_component(&EXPEDITION_REWARDS);
}
