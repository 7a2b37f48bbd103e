//! The durable domain event log format.
//!
//! This is the one wire shape that must stay stable: it is what gets recorded
//! and later replayed. Events are externally tagged by `type`, carry the
//! logical user id (an opaque string, not an entity), event-specific fields,
//! and a millisecond timestamp since an arbitrary epoch. Amounts and prices
//! here are whole units; the fixed-point scale is internal to the world.

use serde::{Deserialize, Serialize};

use crate::components::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "BUILD_STATION", rename_all = "camelCase")]
    BuildStation {
        user_id: String,
        station_type: ResourceKind,
        timestamp: i64,
    },

    /// `price` is recorded for audit; the sale itself always uses the
    /// merchant's current price list.
    #[serde(rename = "SELL_RESOURCE", rename_all = "camelCase")]
    SellResource {
        user_id: String,
        resource_type: ResourceKind,
        amount: i64,
        price: i64,
        timestamp: i64,
    },

    #[serde(rename = "START_EXPEDITION", rename_all = "camelCase")]
    StartExpedition {
        user_id: String,
        target: ResourceKind,
        timestamp: i64,
    },

    #[serde(rename = "PURCHASE_UPGRADE", rename_all = "camelCase")]
    PurchaseUpgrade {
        user_id: String,
        upgrade_id: String,
        timestamp: i64,
    },
}

impl GameEvent {
    pub fn user_id(&self) -> &str {
        match self {
            GameEvent::BuildStation { user_id, .. }
            | GameEvent::SellResource { user_id, .. }
            | GameEvent::StartExpedition { user_id, .. }
            | GameEvent::PurchaseUpgrade { user_id, .. } => user_id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            GameEvent::BuildStation { timestamp, .. }
            | GameEvent::SellResource { timestamp, .. }
            | GameEvent::StartExpedition { timestamp, .. }
            | GameEvent::PurchaseUpgrade { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_stable() {
        let event = GameEvent::BuildStation {
            user_id: "player-1".to_string(),
            station_type: ResourceKind::Ore,
            timestamp: 1000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "BUILD_STATION",
                "userId": "player-1",
                "stationType": "ore",
                "timestamp": 1000,
            })
        );
    }

    #[test]
    fn sell_event_round_trips_with_price() {
        let event = GameEvent::SellResource {
            user_id: "player-1".to_string(),
            resource_type: ResourceKind::Energy,
            amount: 10,
            price: 2,
            timestamp: 5000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
