//! Gameplay facts published on the event bus during a frame.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Immutable record of something that happened this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    StageStarted {
        stage_id: String,
    },
    StageCompleted {
        stage_id: String,
    },
    ObjectiveCompleted {
        objective_id: String,
    },
    EnemySpawned {
        entity: EntityId,
        archetype_id: String,
    },
    /// Published before the entity is destroyed.
    EnemyKilled {
        entity: EntityId,
        by: Option<EntityId>,
    },
    PlayerDamaged {
        amount: f64,
        source: Option<EntityId>,
    },
    WeaponFired {
        weapon_id: String,
        by: EntityId,
    },
    /// Consumed only by the damage system.
    DamageRequested {
        target: EntityId,
        amount: f64,
        source: Option<EntityId>,
    },
    TargetChanged {
        from: Option<EntityId>,
        to: Option<EntityId>,
    },
    PickupCollected {
        pickup_id: String,
        by: EntityId,
    },
}

impl GameEvent {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::StageStarted { .. } => "StageStarted",
            GameEvent::StageCompleted { .. } => "StageCompleted",
            GameEvent::ObjectiveCompleted { .. } => "ObjectiveCompleted",
            GameEvent::EnemySpawned { .. } => "EnemySpawned",
            GameEvent::EnemyKilled { .. } => "EnemyKilled",
            GameEvent::PlayerDamaged { .. } => "PlayerDamaged",
            GameEvent::WeaponFired { .. } => "WeaponFired",
            GameEvent::DamageRequested { .. } => "DamageRequested",
            GameEvent::TargetChanged { .. } => "TargetChanged",
            GameEvent::PickupCollected { .. } => "PickupCollected",
        }
    }
}
