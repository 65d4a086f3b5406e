//! ECS components stored in the sim crate's world.
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in systems, not components.

use std::collections::BTreeSet;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// World placement. `rotation` holds Euler angles (x = pitch, y = yaw, z = roll).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
}

impl Transform {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            rotation: DVec3::ZERO,
        }
    }
}

/// Linear velocity (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
}

impl Health {
    pub fn full(max_hp: f64) -> Self {
        Self { hp: max_hp, max_hp }
    }
}

/// Absorbs incoming damage before health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub value: f64,
    pub max_value: f64,
}

impl Shield {
    pub fn full(max_value: f64) -> Self {
        Self {
            value: max_value,
            max_value,
        }
    }
}

/// Primary weapon runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlots {
    /// Content id of the equipped weapon.
    pub active_weapon_id: String,
    /// Seconds until the next shot is allowed.
    pub cooldown: f64,
    pub heat: f64,
    /// Latched at max heat, released below the recovery threshold.
    pub overheated: bool,
}

impl WeaponSlots {
    pub fn with_weapon(weapon_id: impl Into<String>) -> Self {
        Self {
            active_weapon_id: weapon_id.into(),
            cooldown: 0.0,
            heat: 0.0,
            overheated: false,
        }
    }
}

/// Lock-on state for the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targeting {
    pub current_target: Option<EntityId>,
    /// 0 = no lock, 1 = locked.
    pub lock_progress: f64,
    /// Targeting clock value at the last switch.
    pub last_switch_time: f64,
}

/// Steering assist that turns the ship toward a designated target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoTrace {
    pub enabled: bool,
    pub target: Option<EntityId>,
    /// Gain applied to the aim error before rate clamping.
    pub strength: f64,
    /// Assist disengages once both yaw and pitch errors are inside this angle.
    pub stop_angle_deg: f64,
    /// Manual look magnitude above this cancels the assist.
    pub cancel_look_threshold: f64,
    /// Look contribution computed this frame, in normalized look units.
    pub look_x: f64,
    pub look_y: f64,
}

/// Enemy AI state. The LCG state is carried here so replays stay deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub archetype_id: String,
    pub current_action: AiAction,
    /// AI clock value until which the current action is held.
    pub action_until: f64,
    pub rng_state: u32,
}

/// Perception results consumed by decision and steering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Blackboard {
    pub player_visible: bool,
    pub player_distance: f64,
    /// Angle between the enemy's forward axis and the player (radians).
    pub rel_angle: f64,
    pub last_seen_time: f64,
}

/// Desired velocity written by steering, consumed by enemy movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteeringIntent {
    pub desired_velocity: DVec3,
}

/// Per-ship flight controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipController {
    pub boost_remaining: f64,
    pub boost_cooldown: f64,
    pub current_speed: f64,
    pub yaw_rate: f64,
    pub pitch_rate: f64,
    /// Boost button state last frame, for edge detection.
    pub was_boost_pressed: bool,
    pub look_x_smoothed: f64,
    pub look_y_smoothed: f64,
}

/// Normalized input axes written by the input collaborator each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_x: f64,
    pub move_y: f64,
    pub look_x: f64,
    pub look_y: f64,
    pub fire_primary: bool,
    pub fire_secondary: bool,
    pub boost: bool,
    pub mode: InputMode,
}

/// Spherical hit volume for weapon rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitSphere {
    pub radius: f64,
}

/// Countdown for the on-screen hit confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitMarker {
    pub timer: f64,
}

/// Player wallet and unlocked rewards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub credits: u32,
    pub unlocked_upgrades: Vec<String>,
}

/// Runtime state of the active stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageRunState {
    pub status: StageStatus,
    pub stage_id: String,
    /// Simulation time at which the stage entered `Running`.
    pub start_time: f64,
    pub spawned_enemy_ids: Vec<EntityId>,
    /// Spawned ids known to be dead this run. Ids reused by a later spawn
    /// are removed again.
    pub killed_ids: BTreeSet<EntityId>,
    pub killed_enemies: u32,
    pub remaining_enemies: u32,
    pub credits_awarded: u32,
    pub objective_complete: bool,
    /// Seconds spent in `Running`, drives reinforcement delays.
    pub elapsed: f64,
    /// One flag per reinforcement entry in the stage definition.
    pub reinforcements_spawned: Vec<bool>,
    /// Operator requests, consumed by the stage system.
    pub restart_requested: bool,
    pub kill_requested: bool,
}

impl StageRunState {
    pub fn for_stage(stage_id: impl Into<String>) -> Self {
        Self {
            stage_id: stage_id.into(),
            ..Default::default()
        }
    }

    /// Number of reinforcement waves not yet spawned.
    pub fn pending_reinforcements(&self) -> usize {
        self.reinforcements_spawned.iter().filter(|s| !**s).count()
    }
}

/// Marks the player-controlled ship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerTag;

/// Marks a hostile ship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnemyTag;
