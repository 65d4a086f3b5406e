//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Tactical action chosen by the enemy decision FSM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiAction {
    /// Close distance toward the player.
    #[default]
    Approach,
    /// Circle the player near the preferred range.
    Orbit,
    /// Break sideways for a short burst.
    Evade,
}

/// Stage lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    /// Waiting to spawn the roster.
    #[default]
    Idle,
    /// Roster spawned, objective in progress.
    Running,
    /// Objective met and rewards applied (or stage definition missing).
    Completed,
}

/// Active input device family. Selects look inversion and sensitivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Touch,
    Gyro,
}

/// AI tick channels, each with an independent cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiChannel {
    Perception,
    Decision,
    Steering,
}
