//! Stage lifecycle: spawn the roster, run reinforcements, grant rewards.
//!
//! `Idle -> Running -> Completed`. A restart request returns any state to
//! `Idle`, despawning the run's enemies, and the next start is deferred by
//! one frame so despawn fallout settles first.

use std::f64::consts::TAU;

use glam::DVec3;

use starlance_core::components::{Economy, StageRunState, Transform};
use starlance_core::content::{StageDef, StageEnemyDef};
use starlance_core::enums::StageStatus;
use starlance_core::events::GameEvent;
use starlance_core::types::{basis, EntityId, LOCAL_FORWARD, LOCAL_RIGHT, LOCAL_UP};

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};
use crate::world_setup::{despawn_entity, find_player, first_with, spawn_enemy};

/// Spawn disc radius bounds and growth per enemy.
pub const SPAWN_RADIUS_MIN: f64 = 6.0;
pub const SPAWN_RADIUS_MAX: f64 = 14.0;
pub const SPAWN_RADIUS_PER_ENEMY: f64 = 1.6;
/// Default forward distance is at least this, and at least radius + margin.
pub const SPAWN_DISTANCE_MIN: f64 = 10.0;
pub const SPAWN_DISTANCE_MARGIN: f64 = 6.0;

/// Disc radius for a roster of `total` enemies.
pub fn spawn_radius(total: u32) -> f64 {
    (total as f64 * SPAWN_RADIUS_PER_ENEMY).clamp(SPAWN_RADIUS_MIN, SPAWN_RADIUS_MAX)
}

/// Forward distance range for `stage`, honoring per-stage overrides.
pub fn spawn_distance_range(stage: &StageDef, radius: f64) -> (f64, f64) {
    let default = SPAWN_DISTANCE_MIN.max(radius + SPAWN_DISTANCE_MARGIN);
    let min = stage.spawn_distance_min.unwrap_or(default);
    let max = stage.spawn_distance_max.unwrap_or(min);
    (min, max)
}

/// Frame of reference for spawn placement.
#[derive(Debug, Clone, Copy)]
pub struct SpawnFrame {
    pub center: DVec3,
    pub forward: DVec3,
    pub right: DVec3,
    pub up: DVec3,
}

impl SpawnFrame {
    pub fn from_transform(transform: Option<&Transform>) -> Self {
        match transform {
            Some(t) => {
                let (forward, right, up) = basis(t.rotation);
                Self {
                    center: t.position,
                    forward,
                    right,
                    up,
                }
            }
            None => Self {
                center: DVec3::ZERO,
                forward: LOCAL_FORWARD,
                right: LOCAL_RIGHT,
                up: LOCAL_UP,
            },
        }
    }
}

/// Position of spawn `index` of `total` on a disc of `radius` ahead of the frame.
/// Forward distance steps from `min` to `max` across the roster.
pub fn spawn_position(frame: &SpawnFrame, index: u32, total: u32, radius: f64, min: f64, max: f64) -> DVec3 {
    let angle = if total > 0 {
        index as f64 / total as f64 * TAU
    } else {
        0.0
    };
    let t = if total > 1 {
        index as f64 / (total - 1) as f64
    } else {
        0.0
    };
    let forward_distance = min + (max - min) * t;
    frame.center
        + frame.forward * forward_distance
        + frame.right * (angle.cos() * radius)
        + frame.up * (angle.sin() * radius)
}

#[derive(Default)]
pub struct StageSystem {
    stages: Vec<EntityId>,
    scratch: Vec<EntityId>,
    defer_start: bool,
}

impl StageSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_frame(&mut self, ctx: &SystemContext<'_>) -> SpawnFrame {
        let transform = find_player(ctx.world, &mut self.scratch).and_then(|id| ctx.world.get::<Transform>(id));
        SpawnFrame::from_transform(transform)
    }

    /// Spawn a group laid out on one disc and record the ids.
    fn spawn_group(
        &mut self,
        ctx: &mut SystemContext<'_>,
        state: &mut StageRunState,
        entries: &[StageEnemyDef],
        stage: &StageDef,
    ) {
        let total: u32 = entries.iter().map(|e| e.count).sum();
        let radius = spawn_radius(total);
        let (min, max) = spawn_distance_range(stage, radius);
        let frame = self.spawn_frame(ctx);
        let content = ctx.content;

        let mut index = 0;
        for entry in entries {
            let Some(archetype) = content.enemy(&entry.archetype_id) else {
                log::warn!("stage '{}': unknown enemy archetype '{}'", stage.id, entry.archetype_id);
                continue;
            };
            for _ in 0..entry.count {
                let position = spawn_position(&frame, index, total, radius, min, max);
                index += 1;
                match spawn_enemy(ctx.world, ctx.renderer, ctx.rng, archetype, position) {
                    Ok(id) => {
                        state.killed_ids.remove(&id);
                        state.spawned_enemy_ids.push(id);
                        ctx.bus.publish(GameEvent::EnemySpawned {
                            entity: id,
                            archetype_id: archetype.id.clone(),
                        });
                    }
                    Err(err) => log::warn!("enemy spawn failed: {err}"),
                }
            }
        }
    }

    fn start_stage(&mut self, ctx: &mut SystemContext<'_>, state: &mut StageRunState) {
        let content = ctx.content;
        let Some(stage) = content.stage(&state.stage_id) else {
            log::warn!("stage '{}' not found, marking completed", state.stage_id);
            state.status = StageStatus::Completed;
            return;
        };

        state.status = StageStatus::Running;
        state.start_time = ctx.now;
        state.elapsed = 0.0;
        state.spawned_enemy_ids.clear();
        state.killed_ids.clear();
        state.killed_enemies = 0;
        state.remaining_enemies = 0;
        state.credits_awarded = 0;
        state.objective_complete = false;
        state.reinforcements_spawned = vec![false; stage.reinforcements.len()];

        ctx.bus.publish(GameEvent::StageStarted {
            stage_id: stage.id.clone(),
        });
        self.spawn_group(ctx, state, &stage.enemies, stage);
        state.remaining_enemies = state.spawned_enemy_ids.len() as u32;
        log::info!(
            "stage '{}' started with {} enemies",
            stage.id,
            state.spawned_enemy_ids.len()
        );
    }

    fn spawn_reinforcements(&mut self, ctx: &mut SystemContext<'_>, state: &mut StageRunState) {
        let content = ctx.content;
        let Some(stage) = content.stage(&state.stage_id) else {
            return;
        };
        for (i, wave) in stage.reinforcements.iter().enumerate() {
            let pending = state.reinforcements_spawned.get(i).is_some_and(|spawned| !spawned);
            if !pending || state.elapsed < wave.delay {
                continue;
            }
            let group = [StageEnemyDef {
                archetype_id: wave.archetype_id.clone(),
                count: wave.count,
            }];
            self.spawn_group(ctx, state, &group, stage);
            state.reinforcements_spawned[i] = true;
            state.remaining_enemies =
                (state.spawned_enemy_ids.len() as u32).saturating_sub(state.killed_enemies);
            log::info!(
                "stage '{}': reinforcement {} arrived ({} x {})",
                stage.id,
                i,
                wave.count,
                wave.archetype_id
            );
        }
    }

    fn complete_stage(&mut self, ctx: &mut SystemContext<'_>, state: &mut StageRunState) {
        state.status = StageStatus::Completed;
        let content = ctx.content;

        if let Some(stage) = content.stage(&state.stage_id) {
            state.credits_awarded = stage.rewards.credits;
            let economy = first_with::<Economy>(ctx.world, &mut self.scratch);
            if let Some(economy) = economy.and_then(|id| ctx.world.get_mut::<Economy>(id)) {
                economy.credits += stage.rewards.credits;
                for upgrade in &stage.rewards.upgrades {
                    if !economy.unlocked_upgrades.contains(upgrade) {
                        economy.unlocked_upgrades.push(upgrade.clone());
                    }
                }
            }
        }

        log::info!(
            "stage '{}' completed, {} credits awarded",
            state.stage_id,
            state.credits_awarded
        );
        ctx.bus.publish(GameEvent::StageCompleted {
            stage_id: state.stage_id.clone(),
        });
    }

    fn cleanup_stage(&mut self, ctx: &mut SystemContext<'_>, state: &StageRunState) {
        for &id in &state.spawned_enemy_ids {
            despawn_entity(ctx.world, ctx.renderer, id);
        }
    }

    fn kill_one_enemy(&mut self, ctx: &mut SystemContext<'_>, state: &StageRunState) {
        let Some(&id) = state.spawned_enemy_ids.iter().find(|id| ctx.world.is_alive(**id)) else {
            return;
        };
        despawn_entity(ctx.world, ctx.renderer, id);
        ctx.bus.publish(GameEvent::EnemyKilled { entity: id, by: None });
        log::debug!("debug kill {id}");
    }

    fn update_stage(&mut self, ctx: &mut SystemContext<'_>, state: &mut StageRunState, dt: f64) {
        if state.restart_requested {
            log::info!("stage '{}' restarting", state.stage_id);
            self.cleanup_stage(ctx, state);
            state.status = StageStatus::Idle;
            state.objective_complete = false;
            state.killed_enemies = 0;
            state.remaining_enemies = 0;
            state.credits_awarded = 0;
            state.spawned_enemy_ids.clear();
            state.killed_ids.clear();
            state.reinforcements_spawned.clear();
            state.restart_requested = false;
            self.defer_start = true;
        }

        if state.status == StageStatus::Idle && !self.defer_start {
            self.start_stage(ctx, state);
        }
        self.defer_start = false;

        if state.status == StageStatus::Running {
            state.elapsed += dt;
            self.spawn_reinforcements(ctx, state);
        }

        if state.status == StageStatus::Running && state.objective_complete {
            self.complete_stage(ctx, state);
        }

        if state.kill_requested && state.status == StageStatus::Running {
            state.kill_requested = false;
            self.kill_one_enemy(ctx, state);
        }
    }
}

impl System for StageSystem {
    fn name(&self) -> &'static str {
        "stage"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64) {
        ctx.world
            .query(&[ComponentKind::of::<StageRunState>()], &mut self.stages);
        let stages = std::mem::take(&mut self.stages);

        for &id in &stages {
            // Taken out so spawning can borrow the world mutably.
            let Some(mut state) = ctx.world.remove::<StageRunState>(id) else {
                continue;
            };
            self.update_stage(ctx, &mut state, dt);
            if let Err(err) = ctx.world.insert(id, state) {
                log::warn!("stage state lost: {err}");
            }
        }

        self.stages = stages;
    }
}
