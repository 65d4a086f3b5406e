//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player ship, the session entity (input, stage run state,
//! economy, hit marker) and enemy entities with their component bundles.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starlance_core::components::*;
use starlance_core::content::EnemyArchetypeDef;
use starlance_core::enums::AiAction;
use starlance_core::tuning::Tuning;
use starlance_core::types::EntityId;

use crate::bridge::RenderBridge;
use crate::ecs::{ComponentKind, EcsError, World};

pub const PLAYER_MAX_HP: f64 = 100.0;
pub const PLAYER_MAX_SHIELD: f64 = 50.0;
/// Hit radius for archetypes that don't declare one.
pub const DEFAULT_ENEMY_HIT_RADIUS: f64 = 0.6;

/// Ids of the long-lived entities created at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntities {
    pub player: EntityId,
    pub session: EntityId,
}

/// Create the player ship and the session entity for a run of `stage_id`.
pub fn setup_session(
    world: &mut World,
    tuning: &Tuning,
    stage_id: &str,
    weapon_id: &str,
) -> Result<SessionEntities, EcsError> {
    let player = spawn_player(world, tuning, weapon_id)?;
    let session = world.create();
    world.insert(session, InputState::default())?;
    world.insert(session, StageRunState::for_stage(stage_id))?;
    world.insert(session, Economy::default())?;
    world.insert(session, HitMarker::default())?;
    Ok(SessionEntities { player, session })
}

/// Spawn the player ship at the origin, facing -Z.
pub fn spawn_player(world: &mut World, tuning: &Tuning, weapon_id: &str) -> Result<EntityId, EcsError> {
    let id = world.create();
    world.insert(id, PlayerTag)?;
    world.insert(id, Transform::default())?;
    world.insert(id, Velocity::default())?;
    world.insert(id, ShipController::default())?;
    world.insert(id, WeaponSlots::with_weapon(weapon_id))?;
    world.insert(id, Targeting::default())?;
    world.insert(
        id,
        AutoTrace {
            enabled: false,
            target: None,
            strength: tuning.auto_trace.default_strength,
            stop_angle_deg: tuning.auto_trace.default_stop_angle_deg,
            cancel_look_threshold: tuning.auto_trace.default_cancel_look_threshold,
            look_x: 0.0,
            look_y: 0.0,
        },
    )?;
    world.insert(id, Health::full(PLAYER_MAX_HP))?;
    world.insert(id, Shield::full(PLAYER_MAX_SHIELD))?;
    Ok(id)
}

/// Spawn one enemy of `archetype` at `position` and attach its visuals.
///
/// The AI RNG state is drawn from the simulation RNG so runs with the same
/// seed replay identically.
pub fn spawn_enemy(
    world: &mut World,
    renderer: &mut dyn RenderBridge,
    rng: &mut ChaCha8Rng,
    archetype: &EnemyArchetypeDef,
    position: DVec3,
) -> Result<EntityId, EcsError> {
    let id = world.create();
    world.insert(id, EnemyTag)?;
    world.insert(id, Health::full(archetype.stats.max_hp))?;
    if archetype.stats.shield > 0.0 {
        world.insert(id, Shield::full(archetype.stats.shield))?;
    }
    world.insert(
        id,
        AiState {
            archetype_id: archetype.id.clone(),
            current_action: AiAction::Approach,
            action_until: 0.0,
            rng_state: rng.gen(),
        },
    )?;
    world.insert(id, Blackboard::default())?;
    world.insert(id, SteeringIntent::default())?;
    world.insert(id, Transform::at(position))?;
    world.insert(id, Velocity::default())?;
    world.insert(
        id,
        HitSphere {
            radius: archetype.hit_radius.unwrap_or(DEFAULT_ENEMY_HIT_RADIUS),
        },
    )?;
    renderer.attach(id, &archetype.id, position);
    Ok(id)
}

/// Detach visuals and destroy. No-op for dead ids.
pub fn despawn_entity(world: &mut World, renderer: &mut dyn RenderBridge, id: EntityId) {
    if !world.is_alive(id) {
        return;
    }
    renderer.detach(id);
    world.destroy(id);
}

/// Lowest-id alive entity holding `T`.
pub fn first_with<T: 'static>(world: &World, scratch: &mut Vec<EntityId>) -> Option<EntityId> {
    world.query(&[ComponentKind::of::<T>()], scratch);
    scratch.first().copied()
}

/// The player entity, if one exists with a transform.
pub fn find_player(world: &World, scratch: &mut Vec<EntityId>) -> Option<EntityId> {
    world.query(
        &[ComponentKind::of::<PlayerTag>(), ComponentKind::of::<Transform>()],
        scratch,
    );
    scratch.first().copied()
}
